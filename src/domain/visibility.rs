//! Rules deciding which posts a viewer may see.
//!
//! A post is *live* when it is published, its category is published and its
//! publication time has been reached. Feeds for the public only contain live
//! posts; a profile owner sees every post of their own. Repositories consume
//! [`PostVisibility`] to shape their queries, and in-memory callers use
//! [`is_live`] directly, so both paths share one definition.

use chrono::NaiveDateTime;

use crate::domain::category::Category;
use crate::domain::post::{Post, PostWithRelations};
use crate::domain::types::UserId;

/// Returns `true` when `post` may be shown to the public at `now`.
pub fn is_live(post: &Post, category: &Category, now: NaiveDateTime) -> bool {
    post.is_published && category.is_published && post.pub_date <= now
}

/// Which posts a query is allowed to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostVisibility {
    /// Only posts that are live at the given instant.
    Live { now: NaiveDateTime },
    /// Every post regardless of publication state.
    All,
}

impl PostVisibility {
    pub const fn live_at(now: NaiveDateTime) -> Self {
        Self::Live { now }
    }

    /// Owners browsing their own profile see everything; everyone else,
    /// anonymous visitors included, only sees live posts.
    pub fn for_viewer(owner: UserId, viewer: Option<UserId>, now: NaiveDateTime) -> Self {
        if viewer == Some(owner) {
            Self::All
        } else {
            Self::Live { now }
        }
    }

    pub fn admits(&self, post: &Post, category: &Category) -> bool {
        match self {
            Self::All => true,
            Self::Live { now } => is_live(post, category, *now),
        }
    }
}

impl PostWithRelations {
    pub fn is_live(&self, now: NaiveDateTime) -> bool {
        is_live(&self.post, &self.category, now)
    }
}
