use pickrap_core::db::open_db_in_memory;
use pickrap_core::{
    CategoryService, ErrorStatus, LinkPreview, LinkPreviewFetcher, MemberService,
    NoopLinkPreviewFetcher, ScrapBody, ScrapKind, ScrapRepository, ScrapRequest, ScrapService,
    ServiceError, SqliteScrapRepository, DEFAULT_CATEGORY_NAME,
};
use rusqlite::Connection;
use std::cell::RefCell;
use uuid::Uuid;

const EMAIL: &str = "reader@example.com";

struct RecordingFetcher {
    urls: RefCell<Vec<String>>,
}

impl RecordingFetcher {
    fn new() -> Self {
        Self {
            urls: RefCell::new(Vec::new()),
        }
    }
}

impl LinkPreviewFetcher for RecordingFetcher {
    fn fetch(&self, url: &str) -> LinkPreview {
        self.urls.borrow_mut().push(url.to_string());
        LinkPreview {
            title: Some(format!("title of {url}")),
            image: None,
            description: None,
        }
    }
}

fn setup() -> Connection {
    let conn = open_db_in_memory().unwrap();
    MemberService::from_connection(&conn)
        .unwrap()
        .register(EMAIL)
        .unwrap();
    conn
}

fn save_scrap(conn: &Connection, kind: ScrapKind, content: &str, category_id: Option<Uuid>) -> Uuid {
    let service = ScrapService::from_connection(conn).unwrap();
    let (content, file_url) = if kind.is_media() {
        (None, Some(content.to_string()))
    } else {
        (Some(content.to_string()), None)
    };
    service
        .save(
            ScrapRequest {
                kind,
                content,
                file_url,
                category_id,
            },
            EMAIL,
        )
        .unwrap()
        .id
}

#[test]
fn registered_member_has_exactly_one_default_category() {
    let conn = setup();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();

    let categories = service.find_member_categories(EMAIL).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, DEFAULT_CATEGORY_NAME);
}

#[test]
fn initial_runs_once_per_member() {
    let conn = setup();
    let member = MemberService::from_connection(&conn)
        .unwrap()
        .find_by_email(EMAIL)
        .unwrap();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();

    let err = service.initial(&member).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::ExistCategory);
    assert_eq!(service.find_member_categories(EMAIL).unwrap().len(), 1);
}

#[test]
fn save_creates_category_and_rejects_duplicates() {
    let conn = setup();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();
    let default_id = service.find_member_categories(EMAIL).unwrap()[0].id;

    let travel = service.save("Travel", EMAIL).unwrap();
    assert_eq!(travel.name, "Travel");
    assert_ne!(travel.id, default_id);

    let err = service.save("Travel", EMAIL).unwrap_err();
    assert!(matches!(err, ServiceError::ExistCategory(ref name) if name == "Travel"));
    assert_eq!(err.status(), ErrorStatus::ExistCategory);

    let err = service.save(DEFAULT_CATEGORY_NAME, EMAIL).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::ExistCategory);
}

#[test]
fn same_name_is_allowed_for_different_members() {
    let conn = setup();
    MemberService::from_connection(&conn)
        .unwrap()
        .register("other@example.com")
        .unwrap();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();

    service.save("Travel", EMAIL).unwrap();
    service.save("Travel", "other@example.com").unwrap();
}

#[test]
fn save_enforces_name_length_in_characters() {
    let conn = setup();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();

    service.save(&"a".repeat(20), EMAIL).unwrap();
    let err = service.save(&"b".repeat(21), EMAIL).unwrap_err();
    assert!(matches!(err, ServiceError::CategoryTitleLong { chars: 21 }));
    assert_eq!(err.code(), ErrorStatus::CategoryTitleLong.code());

    let err = service.save("  ", EMAIL).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::EmptyCategoryName);
}

#[test]
fn save_for_unknown_member_fails() {
    let conn = setup();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();
    let err = service.save("Travel", "ghost@example.com").unwrap_err();
    assert_eq!(err.status(), ErrorStatus::NotFoundMember);
}

#[test]
fn update_renames_in_place_and_checks_conflicts() {
    let conn = setup();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();
    let books = service.save("Books", EMAIL).unwrap();
    service.save("Music", EMAIL).unwrap();

    let err = service.update("Books", books.id, EMAIL).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::SameCategory);

    let err = service.update("Music", books.id, EMAIL).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::ExistCategory);

    let err = service.update(&"x".repeat(21), books.id, EMAIL).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::CategoryTitleLong);

    service.update("Novels", books.id, EMAIL).unwrap();
    let names: Vec<String> = service
        .find_member_categories(EMAIL)
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec![DEFAULT_CATEGORY_NAME, "Novels", "Music"]);
}

#[test]
fn default_category_cannot_be_renamed_or_deleted() {
    let conn = setup();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();
    let default_id = service.find_member_categories(EMAIL).unwrap()[0].id;

    let err = service.update("Inbox", default_id, EMAIL).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::CantUpdateCate);

    let err = service.delete(default_id, EMAIL).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::CantDeleteCate);

    let categories = service.find_member_categories(EMAIL).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, DEFAULT_CATEGORY_NAME);
}

#[test]
fn delete_missing_or_foreign_category_reports_not_found() {
    let conn = setup();
    MemberService::from_connection(&conn)
        .unwrap()
        .register("other@example.com")
        .unwrap();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();
    let foreign = service.save("Private", "other@example.com").unwrap();

    let err = service.delete(Uuid::new_v4(), EMAIL).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::DontExistCategory);

    let err = service.delete(foreign.id, EMAIL).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::DontExistCategory);
    assert_eq!(
        service.find_member_categories("other@example.com").unwrap().len(),
        2
    );

    let err = service.update("Mine", foreign.id, EMAIL).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::DontExistCategory);
}

#[test]
fn delete_moves_scraps_to_default_and_conserves_count() {
    let conn = setup();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();
    let default_id = service.find_member_categories(EMAIL).unwrap()[0].id;
    let books = service.save("Books", EMAIL).unwrap();

    let s1 = save_scrap(&conn, ScrapKind::Text, "chapter one", Some(books.id));
    let s2 = save_scrap(&conn, ScrapKind::Link, "https://example.com", Some(books.id));
    save_scrap(&conn, ScrapKind::Text, "loose note", None);

    let scraps = SqliteScrapRepository::try_new(&conn).unwrap();
    let member_id = MemberService::from_connection(&conn)
        .unwrap()
        .find_by_email(EMAIL)
        .unwrap()
        .id;
    let before = scraps.count_member_scraps(member_id).unwrap();

    service.delete(books.id, EMAIL).unwrap();

    assert_eq!(scraps.count_member_scraps(member_id).unwrap(), before);
    assert_eq!(scraps.get_scrap(s1).unwrap().unwrap().category_id, default_id);
    assert_eq!(scraps.get_scrap(s2).unwrap().unwrap().category_id, default_id);
    let remaining = service.find_member_categories(EMAIL).unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(remaining.iter().all(|category| category.id != books.id));
}

#[test]
fn scrap_preview_uses_last_inserted_scrap() {
    let conn = setup();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();
    let travel = service.save("Travel", EMAIL).unwrap();
    save_scrap(&conn, ScrapKind::Text, "first", Some(travel.id));
    save_scrap(&conn, ScrapKind::Image, "https://files/second.png", Some(travel.id));

    let previews = service.find_member_categories_scrap(EMAIL).unwrap();
    assert_eq!(previews.len(), 2);
    assert_eq!(previews[0].name, DEFAULT_CATEGORY_NAME);
    assert!(previews[0].latest_scrap.is_none());

    let latest = previews[1].latest_scrap.as_ref().unwrap();
    assert_eq!(latest.kind, ScrapKind::Image);
    assert_eq!(latest.file_url.as_deref(), Some("https://files/second.png"));
    assert_eq!(latest.content, None);
}

#[test]
fn all_scrap_listing_shapes_body_by_kind() {
    let conn = setup();
    let fetcher = RecordingFetcher::new();
    let service = CategoryService::from_connection(&conn, &fetcher).unwrap();
    let travel = service.save("Travel", EMAIL).unwrap();
    save_scrap(&conn, ScrapKind::Link, "https://example.com/a", Some(travel.id));
    save_scrap(&conn, ScrapKind::Pdf, "https://files/guide.pdf", Some(travel.id));
    save_scrap(&conn, ScrapKind::Text, "pack light", Some(travel.id));

    let contents = service.find_member_categories_all_scrap(EMAIL).unwrap();
    assert_eq!(contents.len(), 2);
    assert!(contents[0].scraps.is_empty());

    let scraps = &contents[1].scraps;
    assert_eq!(scraps.len(), 3);
    assert!(scraps.iter().all(|scrap| scrap.category == "Travel"));
    match &scraps[0].body {
        ScrapBody::Link {
            content,
            url_preview,
        } => {
            assert_eq!(content.as_deref(), Some("https://example.com/a"));
            assert_eq!(
                url_preview.title.as_deref(),
                Some("title of https://example.com/a")
            );
        }
        other => panic!("unexpected body: {other:?}"),
    }
    assert_eq!(
        scraps[1].body,
        ScrapBody::File {
            file_url: Some("https://files/guide.pdf".to_string())
        }
    );
    assert_eq!(
        scraps[2].body,
        ScrapBody::Text {
            content: Some("pack light".to_string())
        }
    );
    assert_eq!(*fetcher.urls.borrow(), vec!["https://example.com/a".to_string()]);
}

#[test]
fn all_scrap_listing_survives_empty_previews() {
    let conn = setup();
    let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher).unwrap();
    save_scrap(&conn, ScrapKind::Link, "https://unreachable.invalid", None);

    let contents = service.find_member_categories_all_scrap(EMAIL).unwrap();
    match &contents[0].scraps[0].body {
        ScrapBody::Link { url_preview, .. } => assert!(url_preview.is_empty()),
        other => panic!("unexpected body: {other:?}"),
    }

    let json = serde_json::to_value(&contents[0].scraps[0]).unwrap();
    assert_eq!(json["scrap_type"], "LINK");
    assert_eq!(json["body"], "link");
    assert_eq!(json["category"], DEFAULT_CATEGORY_NAME);
}
