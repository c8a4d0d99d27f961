use chrono::Utc;
use diesel::prelude::*;

use crate::domain::comment::{Comment, CommentWithAuthor, NewComment};
use crate::domain::types::{CommentId, CommentText, PostId};
use crate::models::comment::{Comment as DbComment, NewComment as DbNewComment};
use crate::models::user::User as DbUser;
use crate::repository::{CommentReader, CommentWriter, DieselRepository, RepositoryResult};

impl CommentReader for DieselRepository {
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<CommentWithAuthor>> {
        use crate::schema::{comments, users};

        let mut conn = self.conn()?;

        let rows = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id.get()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .load::<(DbComment, DbUser)>(&mut conn)?;

        let items = rows
            .into_iter()
            .map(|(comment, author)| -> RepositoryResult<CommentWithAuthor> {
                Ok(CommentWithAuthor {
                    comment: comment.try_into()?,
                    author: author.try_into()?,
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(items)
    }

    fn get_comment(&self, post_id: PostId, id: CommentId) -> RepositoryResult<Option<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let comment = comments::table
            .filter(comments::post_id.eq(post_id.get()))
            .filter(comments::id.eq(id.get()))
            .first::<DbComment>(&mut conn)
            .optional()?;

        Ok(comment.map(TryInto::try_into).transpose()?)
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<CommentId> {
        use crate::schema::comments;

        let mut conn = self.conn()?;
        let db_comment = DbNewComment::from_domain(comment, Utc::now().naive_utc());

        let id = diesel::insert_into(comments::table)
            .values(db_comment)
            .returning(comments::id)
            .get_result::<i32>(&mut conn)?;

        Ok(CommentId::new(id)?)
    }

    fn update_comment(
        &self,
        post_id: PostId,
        id: CommentId,
        text: &CommentText,
    ) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected = diesel::update(
            comments::table
                .filter(comments::post_id.eq(post_id.get()))
                .filter(comments::id.eq(id.get())),
        )
        .set(comments::text.eq(text.as_str()))
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_comment(&self, post_id: PostId, id: CommentId) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            comments::table
                .filter(comments::post_id.eq(post_id.get()))
                .filter(comments::id.eq(id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}
