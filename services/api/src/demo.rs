use chrono::{Duration, Utc};
use clap::Args;
use intake_desk::admin::{AdminListController, AdminListView, DashboardSummary, ModerationRow};
use intake_desk::clock::format_timestamp;
use intake_desk::error::AppError;
use intake_desk::store::{DocumentId, DocumentStore, MemoryDocumentStore};
use intake_desk::submissions::{
    BlogPost, ContactForm, IntakeServices, InternshipApplication, InternshipForm,
    InternshipStatus, Moderated, QuoteForm, QuoteRequest, QuoteStatus, StatusMachine,
    SubmissionKind,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only print records whose searchable fields contain this text
    #[arg(long, default_value = "")]
    pub(crate) query: String,
    /// Skip the internship moderation portion of the demo.
    #[arg(long)]
    pub(crate) skip_internships: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        query,
        skip_internships,
    } = args;

    let store = Arc::new(MemoryDocumentStore::default());
    let services = IntakeServices::new(store.clone());

    println!("Intake desk demo");
    seed_blog_posts(store.as_ref()).await?;
    let quote_ids = submit_sample_quotes(&services).await?;
    submit_sample_contacts(&services).await?;

    let quotes = AdminListController::new(services.quotes.clone());
    let loaded = quotes.activate().await?;
    println!("\nQuote requests ({loaded} loaded)");
    render_moderation(&quotes.moderation_view(&query), |quote: &QuoteRequest| {
        format!("{} ({})", quote.name, quote.phone)
    });

    quotes
        .transition(&quote_ids[0], QuoteStatus::Contacted)
        .await?;
    quotes
        .transition(&quote_ids[1], QuoteStatus::Cancelled)
        .await?;
    if let Err(err) = quotes.transition(&quote_ids[0], QuoteStatus::Pending).await {
        println!("\n  Reopening a contacted quote is refused: {err}");
    }

    println!("\nQuote requests after moderation");
    render_moderation(&quotes.moderation_view(&query), |quote: &QuoteRequest| {
        format!("{} ({})", quote.name, quote.phone)
    });

    if !skip_internships {
        let applications = submit_sample_internships(&services).await?;
        let internships = AdminListController::new(services.internships.clone());
        internships.activate().await?;

        for (id, path) in applications.iter().zip([
            &[InternshipStatus::Reviewed, InternshipStatus::Shortlisted][..],
            &[InternshipStatus::Rejected][..],
            &[InternshipStatus::Shortlisted, InternshipStatus::Accepted][..],
        ]) {
            for next in path {
                internships.transition(id, *next).await?;
            }
        }

        println!("\nInternship applications");
        render_moderation(&internships.moderation_view(&query), |application: &InternshipApplication| {
            format!(
                "{} <{}> {}",
                application.full_name, application.email, application.preferred_track
            )
        });
    }

    let posts = services.blog.list().await?;
    let contacts = services.contacts.list().await?;
    let summary = DashboardSummary::compute(&posts, &contacts, Utc::now().date_naive());
    println!("\nDashboard");
    println!("  Blog posts:             {}", summary.blog_posts);
    println!("  Contact submissions:    {}", summary.contact_submissions);
    println!("  Newsletter subscribers: {}", summary.newsletter_subscribers);
    println!("  Forms received today:   {}", summary.submitted_today);

    Ok(())
}

fn render_moderation<K, F>(view: &AdminListView<ModerationRow<K>>, describe: F)
where
    K: Moderated,
    F: Fn(&K) -> String,
{
    if view.rows.is_empty() {
        println!("  (no matching records out of {})", view.total);
        return;
    }
    for row in &view.rows {
        let status = row.record.status();
        let actions = row
            .actions
            .iter()
            .map(|action| action.label())
            .collect::<Vec<_>>();
        let actions = if status.is_terminal() {
            "closed".to_string()
        } else {
            actions.join(", ")
        };
        let tone = format!("{:?}", row.badge.tone);
        println!(
            "  [{:<11}] {:<9} {}  -> {}",
            status.label(),
            tone,
            describe(&row.record),
            actions
        );
    }
}

async fn seed_blog_posts(store: &MemoryDocumentStore) -> Result<(), AppError> {
    let now = Utc::now();
    let posts = [
        ("Launching our student web clinic", "News", now - Duration::days(3)),
        ("Designing for low-bandwidth users", "Design", now - Duration::days(1)),
    ];
    for (title, category, published_at) in posts {
        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::from(title));
        fields.insert("category".to_string(), Value::from(category));
        fields.insert("author".to_string(), json!({ "name": "Studio Team" }));
        fields.insert(
            "publishedAt".to_string(),
            Value::from(format_timestamp(published_at)),
        );
        store.create(BlogPost::COLLECTION, fields).await?;
    }
    Ok(())
}

async fn submit_sample_quotes<S>(services: &IntakeServices<S>) -> Result<Vec<DocumentId>, AppError>
where
    S: DocumentStore + ?Sized,
{
    let mut ids = Vec::new();
    for (name, phone) in [
        ("Asha Verma", "+91 98765 43210"),
        ("Bilal Khan", "+91 91234 56789"),
        ("Chen Wei", "+65 8123 4567"),
    ] {
        let form = QuoteForm {
            name: Some(name.to_string()),
            phone: Some(phone.to_string()),
        };
        ids.push(services.quotes.submit(form).await?);
    }
    Ok(ids)
}

async fn submit_sample_contacts<S>(services: &IntakeServices<S>) -> Result<(), AppError>
where
    S: DocumentStore + ?Sized,
{
    for (full_name, email, project_type, newsletter) in [
        ("Ravi Kumar", "ravi@example.com", "Website", true),
        ("Lena Ortiz", "lena@example.com", "Mobile App", false),
    ] {
        let form = ContactForm {
            full_name: Some(full_name.to_string()),
            email: Some(email.to_string()),
            project_type: Some(project_type.to_string()),
            budget: Some("Student / Low-budget project".to_string()),
            timeline: Some("1-2 months".to_string()),
            message: Some("We would like to talk about a new project.".to_string()),
            newsletter: Some(newsletter),
            terms_accepted: Some(true),
            ..ContactForm::default()
        };
        services.contacts.submit(form).await?;
    }
    Ok(())
}

async fn submit_sample_internships<S>(
    services: &IntakeServices<S>,
) -> Result<Vec<DocumentId>, AppError>
where
    S: DocumentStore + ?Sized,
{
    let mut ids = Vec::new();
    for (full_name, email, track) in [
        ("Meera Nair", "meera@example.com", "Web Development"),
        ("Arjun Rao", "arjun@example.com", "UI/UX Design"),
        ("Sara Iqbal", "sara@example.com", "Backend Engineering"),
    ] {
        let form = InternshipForm {
            full_name: Some(full_name.to_string()),
            email: Some(email.to_string()),
            preferred_track: Some(track.to_string()),
            preferred_duration: Some("3 months".to_string()),
            preferred_mode: Some("Remote".to_string()),
            current_level: Some("Student / Beginner".to_string()),
            motivation: Some("I want to ship work that real clients use.".to_string()),
            open_to_related_tracks: Some(true),
            ..InternshipForm::default()
        };
        ids.push(services.internships.submit(form).await?);
    }
    Ok(ids)
}
