use crate::submissions::{BlogPost, ContactSubmission, InternshipApplication, QuoteRequest};

/// Text fields an operator can search a record by.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for QuoteRequest {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.phone.as_str()]
    }
}

impl Searchable for ContactSubmission {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.full_name.as_str(), self.email.as_str(), self.project_type.as_str()]
    }
}

impl Searchable for InternshipApplication {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.full_name.as_str(), self.email.as_str(), self.preferred_track.as_str()]
    }
}

impl Searchable for BlogPost {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.category.as_str()]
    }
}

/// Case-insensitive substring match over the record's designated fields. A blank query matches.
pub fn matches_query<T: Searchable + ?Sized>(record: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter_records<'a, T, I>(records: I, query: &str) -> Vec<&'a T>
where
    T: Searchable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|record| matches_query(*record, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentId;
    use chrono::{TimeZone, Utc};

    fn post(id: &str, title: &str, category: &str) -> BlogPost {
        BlogPost {
            id: DocumentId::from(id),
            title: title.to_string(),
            category: category.to_string(),
            author: Default::default(),
            published_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn query_matches_any_designated_field_ignoring_case() {
        let posts = vec![
            post("1", "Rust in production", "Engineering"),
            post("2", "Brand refresh", "Design"),
            post("3", "Hiring interns", "Culture"),
        ];

        let ids: Vec<_> = filter_records(&posts, "ENGIN")
            .into_iter()
            .map(|post| post.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1"]);

        let ids: Vec<_> = filter_records(&posts, "E")
            .into_iter()
            .map(|post| post.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn blank_query_keeps_everything_in_order() {
        let posts = vec![post("1", "a", "x"), post("2", "b", "y")];
        assert_eq!(filter_records(&posts, "   ").len(), 2);
        assert!(filter_records(&posts, "zzz").is_empty());
    }
}
