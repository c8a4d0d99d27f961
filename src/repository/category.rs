use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryId, CategorySlug};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository, RepositoryResult};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order(categories::title.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(TryInto::try_into).transpose()?)
    }

    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::slug.eq(slug.as_str()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(TryInto::try_into).transpose()?)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.into();

        let created = diesel::insert_into(categories::table)
            .values(db_category)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn set_category_published(
        &self,
        id: CategoryId,
        is_published: bool,
    ) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::update(categories::table.filter(categories::id.eq(id.get())))
            .set(categories::is_published.eq(is_published))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
