use pickrap_core::db::open_db_in_memory;
use pickrap_core::{
    CategoryService, ErrorStatus, MemberService, NoopLinkPreviewFetcher, ServiceError,
    DEFAULT_CATEGORY_NAME,
};

#[test]
fn register_normalizes_email_and_creates_default_category() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberService::from_connection(&conn).unwrap();

    let member = members.register("  New.User@Example.COM ").unwrap();
    assert_eq!(member.email, "new.user@example.com");
    assert_eq!(members.find_by_email("NEW.USER@example.com").unwrap(), member);

    let categories = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher)
        .unwrap()
        .find_member_categories(&member.email)
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, DEFAULT_CATEGORY_NAME);
}

#[test]
fn register_rejects_taken_and_invalid_emails() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberService::from_connection(&conn).unwrap();
    members.register("taken@example.com").unwrap();

    let err = members.register("Taken@example.com").unwrap_err();
    assert!(matches!(err, ServiceError::ExistAccount(ref email) if email == "taken@example.com"));
    assert_eq!(err.code(), 2004);

    for email in ["", "   ", "no-at-sign"] {
        let err = members.register(email).unwrap_err();
        assert_eq!(err.status(), ErrorStatus::InvalidEmail);
    }
}

#[test]
fn unknown_member_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberService::from_connection(&conn).unwrap();

    let err = members.find_by_email("ghost@example.com").unwrap_err();
    assert_eq!(err.status(), ErrorStatus::NotFoundMember);
    assert_eq!(
        members.add_hashtag("ghost@example.com", "rust").unwrap_err().status(),
        ErrorStatus::NotFoundMember
    );
}

#[test]
fn hashtags_are_normalized_unique_and_sorted() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberService::from_connection(&conn).unwrap();
    members.register("tagger@example.com").unwrap();

    let first = members.add_hashtag("tagger@example.com", "#Travel").unwrap();
    assert_eq!(first.tag, "travel");
    let again = members.add_hashtag("tagger@example.com", " travel ").unwrap();
    assert_eq!(again.id, first.id);
    members.add_hashtag("tagger@example.com", "books").unwrap();

    let tags: Vec<String> = members
        .list_hashtags("tagger@example.com")
        .unwrap()
        .into_iter()
        .map(|hashtag| hashtag.tag)
        .collect();
    assert_eq!(tags, vec!["books", "travel"]);

    let err = members.add_hashtag("tagger@example.com", " # ").unwrap_err();
    assert_eq!(err.status(), ErrorStatus::InvalidHashtag);
}

#[test]
fn hashtags_are_scoped_per_member() {
    let conn = open_db_in_memory().unwrap();
    let members = MemberService::from_connection(&conn).unwrap();
    members.register("a@example.com").unwrap();
    members.register("b@example.com").unwrap();

    members.add_hashtag("a@example.com", "shared").unwrap();
    members.add_hashtag("b@example.com", "shared").unwrap();

    assert_eq!(members.list_hashtags("a@example.com").unwrap().len(), 1);
    assert_eq!(members.list_hashtags("b@example.com").unwrap().len(), 1);
}
