use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{Category as DomainCategory, NewCategory as DomainNewCategory};
use crate::domain::types::{CategoryDescription, CategorySlug, CategoryTitle, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub slug: &'a str,
    pub is_published: bool,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            title: CategoryTitle::new(category.title)?,
            description: CategoryDescription::new(category.description)?,
            slug: CategorySlug::new(category.slug)?,
            is_published: category.is_published,
            created_at: category.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewCategory> for NewCategory<'a> {
    fn from(category: &'a DomainNewCategory) -> Self {
        Self {
            title: category.title.as_str(),
            description: category.description.as_str(),
            slug: category.slug.as_str(),
            is_published: category.is_published,
        }
    }
}
