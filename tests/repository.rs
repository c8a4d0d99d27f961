use chrono::Duration;
use pushkind_blog::domain::comment::NewComment;
use pushkind_blog::domain::post::{ImageChange, NewPost, PostUpdate};
use pushkind_blog::domain::types::{
    CategoryId, CommentText, Email, ImagePath, PostText, PostTitle, Username,
};
use pushkind_blog::domain::user::{NewUser, UserUpdate};
use pushkind_blog::domain::visibility::PostVisibility;
use pushkind_blog::repository::{
    CategoryReader, CategoryWriter, CommentReader, CommentWriter, LocationReader, PostListQuery,
    PostReader, PostWriter, RepositoryError, UserReader, UserWriter,
};

mod common;

use common::{create_category, create_location, create_post, create_user, hours_ago, now};

fn comment(text: &str) -> CommentText {
    CommentText::new(text).unwrap()
}

#[test]
fn test_user_repository_crud() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let user = create_user(&repo, "alice");
    assert!(user.is_active);
    assert_eq!(user.display_name(), "alice");

    let found = repo
        .get_user_by_username(&Username::new("alice").unwrap())
        .unwrap()
        .expect("user should exist");
    assert_eq!(found.id, user.id);

    repo.update_user(
        user.id,
        &UserUpdate {
            username: Username::new("alice_w").unwrap(),
            email: Email::new("alice@example.com").unwrap(),
            first_name: "Alice".into(),
            last_name: "Walker".into(),
        },
    )
    .unwrap();
    repo.set_password_hash(user.id, "new-hash").unwrap();

    let updated = repo.get_user_by_id(user.id).unwrap().unwrap();
    assert_eq!(updated.username.as_str(), "alice_w");
    assert_eq!(updated.display_name(), "Alice Walker");

    let credentials = repo
        .get_credentials(&Username::new("alice_w").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(credentials.password_hash, "new-hash");
    assert!(
        repo.get_credentials(&Username::new("alice").unwrap())
            .unwrap()
            .is_none()
    );
}

#[test]
fn duplicate_username_is_a_constraint_violation() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    create_user(&repo, "alice");
    let err = repo
        .create_user(&NewUser {
            username: Username::new("alice").unwrap(),
            email: Email::default(),
            password_hash: "hash".into(),
        })
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));
}

#[test]
fn categories_and_locations_are_listed_and_found() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let travel = create_category(&repo, "travel", true);
    create_category(&repo, "food", false);
    create_location(&repo, "Moscow");

    let categories = repo.list_categories().unwrap();
    assert_eq!(categories.len(), 2);

    let by_slug = repo.get_category_by_slug(&travel.slug).unwrap().unwrap();
    assert_eq!(by_slug.id, travel.id);

    repo.set_category_published(travel.id, false).unwrap();
    let hidden = repo.get_category_by_id(travel.id).unwrap().unwrap();
    assert!(!hidden.is_published);

    let locations = repo.list_locations().unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].name.as_str(), "Moscow");
}

#[test]
fn live_listing_hides_unpublished_future_and_hidden_category_posts() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let author = create_user(&repo, "alice");
    let travel = create_category(&repo, "travel", true);
    let hidden = create_category(&repo, "hidden", false);

    let live = create_post(&repo, "Live", &author, &travel, hours_ago(1), true);
    create_post(&repo, "Draft", &author, &travel, hours_ago(1), false);
    create_post(&repo, "Scheduled", &author, &travel, now() + Duration::days(1), true);
    create_post(&repo, "Hidden", &author, &hidden, hours_ago(1), true);

    let (total, posts) = repo
        .list_posts(PostListQuery::new(PostVisibility::live_at(now())))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(posts[0].post.id, live);

    let (total, _) = repo
        .list_posts(PostListQuery::new(PostVisibility::All).author(author.id))
        .unwrap();
    assert_eq!(total, 4);
}

#[test]
fn listing_orders_by_pub_date_and_paginates() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let author = create_user(&repo, "alice");
    let other = create_user(&repo, "bob");
    let travel = create_category(&repo, "travel", true);
    let food = create_category(&repo, "food", true);

    for hours in 1..=12 {
        create_post(
            &repo,
            &format!("Post {hours}"),
            &author,
            &travel,
            hours_ago(hours),
            true,
        );
    }
    create_post(&repo, "Dinner", &other, &food, hours_ago(30), true);

    let visibility = PostVisibility::live_at(now());

    let (total, first_page) = repo
        .list_posts(PostListQuery::new(visibility).paginate(1, 10))
        .unwrap();
    assert_eq!(total, 13);
    assert_eq!(first_page.len(), 10);
    assert_eq!(first_page[0].post.title.as_str(), "Post 1");
    assert!(
        first_page
            .windows(2)
            .all(|pair| pair[0].post.pub_date >= pair[1].post.pub_date)
    );

    let (_, second_page) = repo
        .list_posts(PostListQuery::new(visibility).paginate(2, 10))
        .unwrap();
    assert_eq!(second_page.len(), 3);
    assert_eq!(second_page[2].post.title.as_str(), "Dinner");

    let (total, food_posts) = repo
        .list_posts(PostListQuery::new(visibility).category(food.id))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(food_posts[0].author.username.as_str(), "bob");
    assert_eq!(food_posts[0].category.slug.as_str(), "food");
}

#[test]
fn listed_posts_carry_comment_counts() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let author = create_user(&repo, "alice");
    let reader = create_user(&repo, "bob");
    let travel = create_category(&repo, "travel", true);
    let busy = create_post(&repo, "Busy", &author, &travel, hours_ago(2), true);
    create_post(&repo, "Quiet", &author, &travel, hours_ago(3), true);

    for text in ["first", "second"] {
        repo.create_comment(&NewComment {
            text: comment(text),
            post_id: busy,
            author_id: reader.id,
        })
        .unwrap();
    }

    let (_, posts) = repo
        .list_posts(PostListQuery::new(PostVisibility::live_at(now())))
        .unwrap();
    let counts: Vec<(&str, i64)> = posts
        .iter()
        .map(|p| (p.post.title.as_str(), p.comment_count))
        .collect();
    assert_eq!(counts, vec![("Busy", 2), ("Quiet", 0)]);

    let detail = repo.get_post_by_id(busy).unwrap().unwrap();
    assert_eq!(detail.comment_count, 2);
}

#[test]
fn update_post_applies_image_changes() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let author = create_user(&repo, "alice");
    let travel = create_category(&repo, "travel", true);
    let food = create_category(&repo, "food", true);
    let moscow = create_location(&repo, "Moscow");
    let post_id = create_post(&repo, "Trip", &author, &travel, hours_ago(1), true);

    let update = |image: ImageChange| PostUpdate {
        title: PostTitle::new("Trip, revised").unwrap(),
        text: PostText::new("New body").unwrap(),
        pub_date: hours_ago(2),
        category_id: food.id,
        location_id: Some(moscow.id),
        image,
    };

    let image = ImagePath::new("posts/trip.png").unwrap();
    repo.update_post(post_id, &update(ImageChange::Replace(image.clone())))
        .unwrap();
    let stored = repo.get_post_by_id(post_id).unwrap().unwrap();
    assert_eq!(stored.post.title.as_str(), "Trip, revised");
    assert_eq!(stored.category.id, food.id);
    assert_eq!(stored.location.map(|l| l.id), Some(moscow.id));
    assert_eq!(stored.post.image, Some(image.clone()));
    assert_eq!(stored.post.author_id, author.id);

    repo.update_post(post_id, &update(ImageChange::Keep)).unwrap();
    let stored = repo.get_post_by_id(post_id).unwrap().unwrap();
    assert_eq!(stored.post.image, Some(image));

    repo.update_post(post_id, &update(ImageChange::Clear)).unwrap();
    let stored = repo.get_post_by_id(post_id).unwrap().unwrap();
    assert_eq!(stored.post.image, None);
}

#[test]
fn deleting_a_post_removes_its_comments() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let author = create_user(&repo, "alice");
    let travel = create_category(&repo, "travel", true);
    let post_id = create_post(&repo, "Trip", &author, &travel, hours_ago(1), true);
    repo.create_comment(&NewComment {
        text: comment("Nice"),
        post_id,
        author_id: author.id,
    })
    .unwrap();

    assert_eq!(repo.delete_post(post_id).unwrap(), 1);
    assert!(repo.get_post_by_id(post_id).unwrap().is_none());
    assert!(repo.list_comments(post_id).unwrap().is_empty());
}

#[test]
fn comment_operations_are_scoped_to_their_post() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let author = create_user(&repo, "alice");
    let travel = create_category(&repo, "travel", true);
    let first = create_post(&repo, "First", &author, &travel, hours_ago(1), true);
    let second = create_post(&repo, "Second", &author, &travel, hours_ago(2), true);

    let comment_id = repo
        .create_comment(&NewComment {
            text: comment("On the first post"),
            post_id: first,
            author_id: author.id,
        })
        .unwrap();

    assert!(repo.get_comment(second, comment_id).unwrap().is_none());
    assert_eq!(
        repo.update_comment(second, comment_id, &comment("moved"))
            .unwrap(),
        0
    );
    assert_eq!(repo.delete_comment(second, comment_id).unwrap(), 0);

    assert_eq!(
        repo.update_comment(first, comment_id, &comment("edited"))
            .unwrap(),
        1
    );
    let stored = repo.get_comment(first, comment_id).unwrap().unwrap();
    assert_eq!(stored.text.as_str(), "edited");

    let listed = repo.list_comments(first).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].author.id, author.id);

    assert_eq!(repo.delete_comment(first, comment_id).unwrap(), 1);
    assert!(
        repo.get_comment(first, comment_id)
            .unwrap()
            .is_none()
    );
}

#[test]
fn posts_cannot_reference_missing_categories() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let author = create_user(&repo, "alice");

    let err = repo
        .create_post(&NewPost {
            title: PostTitle::new("Orphan").unwrap(),
            text: PostText::new("Body").unwrap(),
            pub_date: hours_ago(1),
            image: None,
            is_published: true,
            author_id: author.id,
            category_id: CategoryId::new(999).unwrap(),
            location_id: None,
        })
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));
}
