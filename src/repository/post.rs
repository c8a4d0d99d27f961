use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::post::{ImageChange, NewPost, PostUpdate, PostWithRelations};
use crate::domain::types::PostId;
use crate::domain::visibility::PostVisibility;
use crate::models::category::Category as DbCategory;
use crate::models::location::Location as DbLocation;
use crate::models::post::{NewPost as DbNewPost, Post as DbPost};
use crate::models::user::User as DbUser;
use crate::repository::{DieselRepository, PostListQuery, PostReader, PostWriter, RepositoryResult};

type PostRow = (DbPost, DbCategory, DbUser, Option<DbLocation>);

/// Count comments for every post in `ids` with a single grouped query.
fn comment_counts(
    conn: &mut SqliteConnection,
    ids: &[i32],
) -> RepositoryResult<HashMap<i32, i64>> {
    use crate::schema::comments;

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let counts = comments::table
        .filter(comments::post_id.eq_any(ids))
        .group_by(comments::post_id)
        .select((comments::post_id, diesel::dsl::count_star()))
        .load::<(i32, i64)>(conn)?;

    Ok(counts.into_iter().collect())
}

fn into_domain(
    rows: Vec<PostRow>,
    counts: &HashMap<i32, i64>,
) -> RepositoryResult<Vec<PostWithRelations>> {
    rows.into_iter()
        .map(|(post, category, author, location)| -> RepositoryResult<PostWithRelations> {
            let comment_count = counts.get(&post.id).copied().unwrap_or_default();
            Ok(PostWithRelations {
                post: post.try_into()?,
                category: category.try_into()?,
                location: location.map(TryInto::try_into).transpose()?,
                author: author.try_into()?,
                comment_count,
            })
        })
        .collect()
}

impl PostReader for DieselRepository {
    fn list_posts(
        &self,
        query: PostListQuery,
    ) -> RepositoryResult<(usize, Vec<PostWithRelations>)> {
        use crate::schema::{categories, locations, posts, users};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = posts::table
                .inner_join(categories::table)
                .inner_join(users::table)
                .left_join(locations::table)
                .into_boxed::<Sqlite>();

            if let Some(category_id) = query.category_id {
                items = items.filter(posts::category_id.eq(category_id.get()));
            }

            if let Some(author_id) = query.author_id {
                items = items.filter(posts::author_id.eq(author_id.get()));
            }

            if let PostVisibility::Live { now } = query.visibility {
                items = items
                    .filter(posts::is_published.eq(true))
                    .filter(categories::is_published.eq(true))
                    .filter(posts::pub_date.le(now));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let rows = items
            .order((posts::pub_date.desc(), posts::id.desc()))
            .load::<PostRow>(&mut conn)?;

        let ids = rows.iter().map(|(post, ..)| post.id).collect::<Vec<_>>();
        let counts = comment_counts(&mut conn, &ids)?;

        Ok((total, into_domain(rows, &counts)?))
    }

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<PostWithRelations>> {
        use crate::schema::{categories, locations, posts, users};

        let mut conn = self.conn()?;

        let row = posts::table
            .inner_join(categories::table)
            .inner_join(users::table)
            .left_join(locations::table)
            .filter(posts::id.eq(id.get()))
            .first::<PostRow>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let counts = comment_counts(&mut conn, &[row.0.id])?;
        Ok(into_domain(vec![row], &counts)?.pop())
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<PostId> {
        use crate::schema::posts;

        let mut conn = self.conn()?;
        let db_post: DbNewPost = post.into();

        let id = diesel::insert_into(posts::table)
            .values(db_post)
            .returning(posts::id)
            .get_result::<i32>(&mut conn)?;

        Ok(PostId::new(id)?)
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let affected = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let target = || posts::table.filter(posts::id.eq(id.get()));

            let affected = diesel::update(target())
                .set((
                    posts::title.eq(update.title.as_str()),
                    posts::text.eq(update.text.as_str()),
                    posts::pub_date.eq(update.pub_date),
                    posts::category_id.eq(update.category_id.get()),
                    posts::location_id.eq(update.location_id.map(|id| id.get())),
                ))
                .execute(conn)?;

            match &update.image {
                ImageChange::Keep => {}
                ImageChange::Replace(image) => {
                    diesel::update(target())
                        .set(posts::image.eq(Some(image.as_str())))
                        .execute(conn)?;
                }
                ImageChange::Clear => {
                    diesel::update(target())
                        .set(posts::image.eq(None::<String>))
                        .execute(conn)?;
                }
            }

            Ok(affected)
        })?;

        Ok(affected)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        use crate::schema::{comments, posts};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(comments::table.filter(comments::post_id.eq(id.get())))
                .execute(conn)?;

            diesel::delete(posts::table.filter(posts::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }
}
