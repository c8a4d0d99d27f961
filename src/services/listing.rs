//! Paginated feeds: the index, a category and a user's profile.

use chrono::Utc;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{CategorySlug, Username};
use crate::domain::visibility::PostVisibility;
use crate::dto::blog::{CategoryFeed, PostPage, ProfileFeed};
use crate::repository::{CategoryReader, PostListQuery, PostReader, UserReader};

use super::{ServiceError, ServiceResult};

/// Posts per page on the index and category feeds.
pub const FEED_ITEMS_PER_PAGE: usize = 10;
/// Posts per page on a profile.
pub const PROFILE_ITEMS_PER_PAGE: usize = 5;

/// Run `query` for `page` and reject pages outside the listing. An empty
/// listing still has a first page.
fn fetch_page<R>(
    repo: &R,
    query: PostListQuery,
    page: usize,
    per_page: usize,
) -> ServiceResult<PostPage>
where
    R: PostReader,
{
    if page == 0 {
        return Err(ServiceError::NotFound);
    }

    let (total, posts) = match repo.list_posts(query.paginate(page, per_page)) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Failed to list posts: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let total_pages = total.div_ceil(per_page).max(1);
    if page > total_pages {
        return Err(ServiceError::NotFound);
    }

    Ok(PostPage {
        items: posts,
        page,
        total,
        total_pages,
    })
}

/// Live posts of every category, newest first.
pub fn show_index<R>(page: usize, repo: &R) -> ServiceResult<PostPage>
where
    R: PostReader,
{
    let now = Utc::now().naive_utc();
    let query = PostListQuery::new(PostVisibility::live_at(now));
    fetch_page(repo, query, page, FEED_ITEMS_PER_PAGE)
}

/// Live posts of a published category.
pub fn show_category<R>(slug: &str, page: usize, repo: &R) -> ServiceResult<CategoryFeed>
where
    R: CategoryReader + PostReader,
{
    let Ok(slug) = CategorySlug::new(slug) else {
        return Err(ServiceError::NotFound);
    };

    let category = match repo.get_category_by_slug(&slug) {
        Ok(Some(category)) if category.is_published => category,
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category by slug: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let now = Utc::now().naive_utc();
    let query = PostListQuery::new(PostVisibility::live_at(now)).category(category.id);
    let posts = fetch_page(repo, query, page, FEED_ITEMS_PER_PAGE)?;

    Ok(CategoryFeed { category, posts })
}

/// Posts written by `username`. The owner sees all of them, everyone else
/// only the live ones.
pub fn show_profile<R>(
    username: &str,
    viewer: Option<&AuthenticatedUser>,
    page: usize,
    repo: &R,
) -> ServiceResult<ProfileFeed>
where
    R: UserReader + PostReader,
{
    let Ok(username) = Username::new(username) else {
        return Err(ServiceError::NotFound);
    };

    let profile = match repo.get_user_by_username(&username) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get user by username: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let now = Utc::now().naive_utc();
    let viewer_id = viewer.map(|user| user.id);
    let visibility = PostVisibility::for_viewer(profile.id, viewer_id, now);
    let query = PostListQuery::new(visibility).author(profile.id);
    let posts = fetch_page(repo, query, page, PROFILE_ITEMS_PER_PAGE)?;

    Ok(ProfileFeed {
        is_owner: viewer_id == Some(profile.id),
        profile,
        posts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestRepository;
    use chrono::{Duration, NaiveDateTime};

    fn hours_ago(hours: i64) -> NaiveDateTime {
        Utc::now().naive_utc() - Duration::hours(hours)
    }

    #[test]
    fn index_shows_only_live_posts() {
        let repo = TestRepository::new();
        let author = repo.add_user("anna");
        let travel = repo.add_category("travel", true);
        let hidden = repo.add_category("hidden", false);

        let live = repo.add_post("Live", &author, &travel, hours_ago(1), true);
        repo.add_post("Draft", &author, &travel, hours_ago(1), false);
        repo.add_post("Scheduled", &author, &travel, hours_ago(-1), true);
        repo.add_post("Hidden category", &author, &hidden, hours_ago(1), true);

        let page = show_index(1, &repo).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].post.id, live.id);
    }

    #[test]
    fn index_is_newest_first_and_ten_per_page() {
        let repo = TestRepository::new();
        let author = repo.add_user("anna");
        let travel = repo.add_category("travel", true);
        for i in 0..12 {
            repo.add_post(&format!("Post {i}"), &author, &travel, hours_ago(20 - i), true);
        }

        let first = show_index(1, &repo).unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items[0].post.title.as_str(), "Post 11");

        let second = show_index(2, &repo).unwrap();
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.items[1].post.title.as_str(), "Post 0");
    }

    #[test]
    fn pages_outside_the_listing_are_not_found() {
        let repo = TestRepository::new();
        assert!(show_index(1, &repo).unwrap().items.is_empty());
        assert_eq!(show_index(0, &repo).unwrap_err(), ServiceError::NotFound);
        assert_eq!(show_index(2, &repo).unwrap_err(), ServiceError::NotFound);
    }

    #[test]
    fn category_feed_requires_published_category() {
        let repo = TestRepository::new();
        let author = repo.add_user("anna");
        let travel = repo.add_category("travel", true);
        repo.add_category("drafts", false);
        repo.add_post("Trip", &author, &travel, hours_ago(1), true);

        let feed = show_category("travel", 1, &repo).unwrap();
        assert_eq!(feed.category.id, travel.id);
        assert_eq!(feed.posts.total, 1);

        assert_eq!(
            show_category("drafts", 1, &repo).unwrap_err(),
            ServiceError::NotFound
        );
        assert_eq!(
            show_category("missing", 1, &repo).unwrap_err(),
            ServiceError::NotFound
        );
        assert_eq!(
            show_category("not a slug", 1, &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn category_feed_excludes_other_categories() {
        let repo = TestRepository::new();
        let author = repo.add_user("anna");
        let travel = repo.add_category("travel", true);
        let food = repo.add_category("food", true);
        repo.add_post("Trip", &author, &travel, hours_ago(1), true);
        repo.add_post("Soup", &author, &food, hours_ago(1), true);

        let feed = show_category("food", 1, &repo).unwrap();
        assert_eq!(feed.posts.total, 1);
        assert_eq!(feed.posts.items[0].post.title.as_str(), "Soup");
    }

    #[test]
    fn owner_sees_hidden_posts_on_own_profile() {
        let repo = TestRepository::new();
        let anna = repo.add_user("anna");
        let boris = repo.add_user("boris");
        let travel = repo.add_category("travel", true);
        repo.add_post("Live", &anna, &travel, hours_ago(1), true);
        repo.add_post("Draft", &anna, &travel, hours_ago(1), false);
        repo.add_post("Scheduled", &anna, &travel, hours_ago(-1), true);

        let owner = AuthenticatedUser::from(&anna);
        let own = show_profile("anna", Some(&owner), 1, &repo).unwrap();
        assert!(own.is_owner);
        assert_eq!(own.posts.total, 3);

        let other = AuthenticatedUser::from(&boris);
        let foreign = show_profile("anna", Some(&other), 1, &repo).unwrap();
        assert!(!foreign.is_owner);
        assert_eq!(foreign.posts.total, 1);

        let anonymous = show_profile("anna", None, 1, &repo).unwrap();
        assert_eq!(anonymous.posts.total, 1);
    }

    #[test]
    fn profile_pages_hold_five_posts() {
        let repo = TestRepository::new();
        let anna = repo.add_user("anna");
        let travel = repo.add_category("travel", true);
        for i in 0..6 {
            repo.add_post(&format!("Post {i}"), &anna, &travel, hours_ago(10 - i), true);
        }

        let first = show_profile("anna", None, 1, &repo).unwrap();
        assert_eq!(first.posts.items.len(), 5);
        assert_eq!(first.posts.total_pages, 2);
    }

    #[test]
    fn unknown_profile_is_not_found() {
        let repo = TestRepository::new();
        assert_eq!(
            show_profile("ghost", None, 1, &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }
}
