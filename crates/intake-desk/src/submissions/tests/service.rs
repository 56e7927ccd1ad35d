use super::common::*;
use crate::store::{DocumentId, DocumentStore, SortDirection, StoreError};
use crate::submissions::{
    ContactForm, ContactSubmission, InternshipApplication, InternshipStatus, QuoteRequest,
    QuoteStatus, StatusMachine, SubmissionError, SubmissionKind, ValidationError,
    DEFAULT_CONTACT_METHOD,
};

fn blank_contact_field(form: &mut ContactForm, field: &str) {
    match field {
        "fullName" => form.full_name = None,
        "email" => form.email = Some(" ".to_string()),
        "projectType" => form.project_type = None,
        "budget" => form.budget = Some(String::new()),
        "timeline" => form.timeline = None,
        "message" => form.message = None,
        other => panic!("no contact field named {other}"),
    }
}

#[tokio::test]
async fn quote_lifecycle_moves_forward_and_never_back() {
    let (_, services) = build_services();

    let id = services
        .quotes
        .submit(quote_form("Asha", "+911234"))
        .await
        .expect("quote stored");

    let listed = services.quotes.list().await.expect("quotes listed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].name, "Asha");
    assert_eq!(listed[0].phone, "+911234");
    assert_eq!(listed[0].status, QuoteStatus::Pending);
    assert_eq!(listed[0].submitted_at, start_of_day());

    let status = services
        .quotes
        .update_status(&id, QuoteStatus::Contacted)
        .await
        .expect("pending -> contacted");
    assert_eq!(status, QuoteStatus::Contacted);

    match services.quotes.update_status(&id, QuoteStatus::Pending).await {
        Err(SubmissionError::Validation(ValidationError::InvalidTransition { from, to })) => {
            assert_eq!((from, to), ("contacted", "pending"));
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }

    let stored = services.quotes.get(&id).await.expect("read").expect("present");
    assert_eq!(stored.status, QuoteStatus::Contacted);
}

#[tokio::test]
async fn quote_transitions_follow_the_table_for_every_pair() {
    for from in QuoteStatus::all() {
        for to in QuoteStatus::all() {
            let (store, services) = build_services();
            let id = services
                .quotes
                .submit(quote_form("Asha", "+911234"))
                .await
                .expect("quote stored");
            if *from != QuoteStatus::Pending {
                store
                    .update_field(
                        QuoteRequest::COLLECTION,
                        &id,
                        "status",
                        serde_json::json!(from.label()),
                    )
                    .await
                    .expect("seed status");
            }
            let writes_before = store.write_count();

            let result = services.quotes.update_status(&id, *to).await;

            if from.can_transition_to(*to) {
                assert_eq!(result, Ok(*to), "{from:?} -> {to:?} should be allowed");
                assert_eq!(store.write_count(), writes_before + 1);
            } else {
                assert!(
                    matches!(
                        result,
                        Err(SubmissionError::Validation(
                            ValidationError::InvalidTransition { .. }
                        ))
                    ),
                    "{from:?} -> {to:?} should be rejected, got {result:?}"
                );
                assert_eq!(store.write_count(), writes_before, "rejected without a write");
            }
        }
    }
}

#[tokio::test]
async fn completed_quote_can_only_be_cancelled() {
    let (store, services) = build_services();
    let id = services
        .quotes
        .submit(quote_form("Asha", "+911234"))
        .await
        .expect("quote stored");
    services
        .quotes
        .update_status(&id, QuoteStatus::Completed)
        .await
        .expect("pending -> completed");

    for reopened in [QuoteStatus::Pending, QuoteStatus::Contacted] {
        let writes = store.write_count();
        assert!(services.quotes.update_status(&id, reopened).await.is_err());
        assert_eq!(store.write_count(), writes);
    }

    let status = services
        .quotes
        .update_status(&id, QuoteStatus::Cancelled)
        .await
        .expect("completed -> cancelled");
    assert_eq!(status, QuoteStatus::Cancelled);

    let writes = store.write_count();
    assert!(services
        .quotes
        .update_status(&id, QuoteStatus::Completed)
        .await
        .is_err());
    assert_eq!(store.write_count(), writes);
}

#[tokio::test]
async fn closed_internship_applications_cannot_be_reopened() {
    for terminal in [InternshipStatus::Accepted, InternshipStatus::Rejected] {
        let (store, services) = build_services();
        let id = services
            .internships
            .submit(internship_form("Meera", "Web Development"))
            .await
            .expect("application stored");
        services
            .internships
            .update_status(&id, terminal)
            .await
            .expect("pending can close directly");

        for next in InternshipStatus::all() {
            let writes_before = store.write_count();
            let result = services.internships.update_status(&id, *next).await;
            assert!(result.is_err(), "{terminal:?} -> {next:?} must fail");
            assert_eq!(store.write_count(), writes_before);
        }
    }
}

#[tokio::test]
async fn internship_without_track_is_rejected_before_the_store() {
    let (store, services) = build_services();
    let form = crate::submissions::InternshipForm {
        preferred_track: None,
        ..internship_form("Meera", "unused")
    };

    let result = services.internships.submit(form).await;

    assert_eq!(
        result,
        Err(SubmissionError::Validation(ValidationError::MissingField {
            field: "preferredTrack"
        }))
    );
    assert_eq!(store.write_count(), 0);
    assert!(store.is_empty(InternshipApplication::COLLECTION));
}

#[tokio::test]
async fn every_required_field_is_checked_for_every_kind() {
    let (store, services) = build_services();

    let blank_quote = [quote_form("", "+911234"), quote_form("Asha", "  ")];
    for form in blank_quote {
        assert!(services.quotes.submit(form).await.is_err());
    }

    for field in ["fullName", "email", "projectType", "budget", "timeline", "message"] {
        let mut form = contact_form("Ravi Kumar", "Website");
        blank_contact_field(&mut form, field);
        match services.contacts.submit(form).await {
            Err(SubmissionError::Validation(error)) => assert_eq!(error.field(), Some(field)),
            other => panic!("expected {field} to be required, got {other:?}"),
        }
    }

    let mut form = internship_form("Meera", "Design");
    form.motivation = Some("\n".to_string());
    assert!(services.internships.submit(form).await.is_err());

    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn contact_submission_round_trips_with_defaults() {
    let (_, services) = build_services();
    let form = ContactForm {
        newsletter: Some(true),
        links: Some(" https://portfolio.example ".to_string()),
        ..contact_form("Ravi Kumar", "Website")
    };

    let id = services.contacts.submit(form).await.expect("contact stored");
    let listed = services.contacts.list().await.expect("contacts listed");

    let stored: &ContactSubmission = listed
        .iter()
        .find(|contact| contact.id == id)
        .expect("submitted id is listed");
    assert_eq!(stored.full_name, "Ravi Kumar");
    assert_eq!(stored.email, "ravi.kumar@example.com");
    assert_eq!(stored.links, "https://portfolio.example");
    assert_eq!(stored.phone, "");
    assert_eq!(stored.organization, "");
    assert_eq!(stored.contact_method, DEFAULT_CONTACT_METHOD);
    assert!(stored.newsletter);
    assert!(!stored.terms_accepted);
}

#[tokio::test]
async fn later_submissions_are_listed_first() {
    let (_, services) = build_services();
    let first = services
        .internships
        .submit(internship_form("Meera", "Design"))
        .await
        .expect("first stored");
    let second = services
        .internships
        .submit(internship_form("Arjun", "Backend"))
        .await
        .expect("second stored");

    let listed = services.internships.list().await.expect("listed");

    let ids: Vec<&DocumentId> = listed.iter().map(|record| &record.id).collect();
    assert_eq!(ids, vec![&second, &first]);
    assert!(listed
        .iter()
        .all(|record| record.status == InternshipStatus::Pending));
    assert!(listed[0].submitted_at > listed[1].submitted_at);
}

#[tokio::test]
async fn listing_twice_without_writes_is_stable() {
    let (_, services) = build_services();
    for name in ["Asha", "Bilal", "Chen"] {
        services
            .quotes
            .submit(quote_form(name, "+910000"))
            .await
            .expect("stored");
    }

    let first = services.quotes.list().await.expect("first list");
    let second = services.quotes.list().await.expect("second list");

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn empty_collections_list_as_empty() {
    let (_, services) = build_services();
    assert!(services.quotes.list().await.expect("listed").is_empty());
    assert!(services.blog.list().await.expect("listed").is_empty());
}

#[tokio::test]
async fn missing_record_transition_is_a_write_error() {
    let (store, services) = build_services();

    let result = services
        .quotes
        .update_status(&DocumentId::from("missing"), QuoteStatus::Contacted)
        .await;

    assert!(matches!(
        result,
        Err(SubmissionError::Store(StoreError::Write(_)))
    ));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn unknown_status_labels_are_validation_errors() {
    let (store, services) = build_services();
    let id = services
        .quotes
        .submit(quote_form("Asha", "+911234"))
        .await
        .expect("stored");

    let result = services.quotes.update_status_label(&id, "archived").await;

    assert_eq!(
        result,
        Err(SubmissionError::Validation(ValidationError::UnknownStatus {
            value: "archived".to_string()
        }))
    );
    assert_eq!(store.write_count(), 1);

    let status = services
        .quotes
        .update_status_label(&id, "Completed")
        .await
        .expect("label parsed case-insensitively");
    assert_eq!(status, QuoteStatus::Completed);
}

#[tokio::test]
async fn status_update_touches_only_the_status_field() {
    let (store, services) = build_services();
    let id = services
        .internships
        .submit(internship_form("Meera", "Design"))
        .await
        .expect("stored");
    let before = store
        .fetch(InternshipApplication::COLLECTION, &id)
        .await
        .expect("read")
        .expect("present");

    services
        .internships
        .update_status(&id, InternshipStatus::Shortlisted)
        .await
        .expect("pending -> shortlisted");

    let after = store
        .fetch(InternshipApplication::COLLECTION, &id)
        .await
        .expect("read")
        .expect("present");
    let mut expected = before.fields.clone();
    expected.insert("status".to_string(), serde_json::json!("shortlisted"));
    assert_eq!(after.fields, expected);
}

#[tokio::test]
async fn store_outage_surfaces_read_and_write_errors() {
    let (store, services) = build_services();
    store.set_available(false);

    assert!(matches!(
        services.quotes.submit(quote_form("Asha", "+911234")).await,
        Err(SubmissionError::Store(StoreError::Write(_)))
    ));
    assert!(matches!(
        services.quotes.list().await,
        Err(SubmissionError::Store(StoreError::Read(_)))
    ));
}

#[tokio::test]
async fn malformed_documents_fail_the_listing() {
    let (store, services) = build_services();
    let mut fields = serde_json::Map::new();
    fields.insert("name".to_string(), serde_json::json!("No phone"));
    fields.insert(
        "submittedAt".to_string(),
        serde_json::json!("2025-03-10T08:00:00.000000Z"),
    );
    store
        .create(QuoteRequest::COLLECTION, fields)
        .await
        .expect("raw write");

    match services.quotes.list().await {
        Err(SubmissionError::Store(StoreError::Read(message))) => {
            assert!(message.contains("malformed"), "{message}");
        }
        other => panic!("expected read error, got {other:?}"),
    }

    let raw = store
        .list(QuoteRequest::COLLECTION, "submittedAt", SortDirection::Descending)
        .await
        .expect("raw listing");
    assert_eq!(raw.len(), 1);
}

#[tokio::test]
async fn blog_posts_list_newest_first() {
    let (store, services) = build_services();
    let older = seed_blog_post(&store, "Launch notes", "News", start_of_day()).await;
    let newer = seed_blog_post(
        &store,
        "Design systems",
        "Design",
        start_of_day() + chrono::Duration::days(1),
    )
    .await;

    let posts = services.blog.list().await.expect("posts listed");

    assert_eq!(
        posts.iter().map(|post| post.id.clone()).collect::<Vec<_>>(),
        vec![newer, older]
    );
    assert_eq!(posts[0].author.name, "Studio Team");
}
