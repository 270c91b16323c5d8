//! Input checks that run before any store or publish call.

use url::Url;
use uuid::Uuid;

use newsroom_types::models::NewsInput;

use crate::error::NewsError;

/// Checks a create request and returns the parsed project id.
pub fn validate_create(input: &NewsInput) -> Result<Uuid, NewsError> {
    let mut violations = Vec::new();

    for (field, value) in [
        ("title", &input.title),
        ("project", &input.project),
        ("type", &input.kind),
        ("content", &input.content),
        ("thumbnail", &input.thumbnail),
    ] {
        if value.trim().is_empty() {
            violations.push(format!("{} is required", field));
        }
    }

    let project = parse_project(&input.project, &mut violations);
    check_url("thumbnail", &input.thumbnail, &mut violations);
    check_url("featured", input.featured.as_deref().unwrap_or(""), &mut violations);

    match project {
        Some(project) if violations.is_empty() => Ok(project),
        _ => Err(NewsError::Validation(violations.join("; "))),
    }
}

/// Checks the fields an update actually sets and returns the parsed project
/// id, if one was given.
pub fn validate_update(input: &NewsInput) -> Result<Option<Uuid>, NewsError> {
    let mut violations = Vec::new();

    // Set fields must still satisfy the create rules.
    for (field, value) in [
        ("title", &input.title),
        ("type", &input.kind),
        ("content", &input.content),
        ("thumbnail", &input.thumbnail),
    ] {
        if !value.is_empty() && value.trim().is_empty() {
            violations.push(format!("{} must not be blank", field));
        }
    }

    let project = parse_project(&input.project, &mut violations);
    check_url("thumbnail", &input.thumbnail, &mut violations);
    check_url("featured", input.featured.as_deref().unwrap_or(""), &mut violations);

    if violations.is_empty() {
        Ok(project)
    } else {
        Err(NewsError::Validation(violations.join("; ")))
    }
}

fn parse_project(raw: &str, violations: &mut Vec<String>) -> Option<Uuid> {
    if raw.is_empty() {
        return None;
    }
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            violations.push(format!("project '{}' is not a valid identifier", raw));
            None
        }
    }
}

/// Empty values are left to the required-field check.
fn check_url(field: &str, raw: &str, violations: &mut Vec<String>) {
    if raw.is_empty() {
        return;
    }
    let ok = Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host());
    if !ok {
        violations.push(format!("{} must be a well-formed http(s) URL", field));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewsInput {
        NewsInput {
            title: "Launch".into(),
            project: Uuid::new_v4().to_string(),
            kind: "release".into(),
            content: "We shipped.".into(),
            thumbnail: "https://example.com/thumb.png".into(),
            featured: None,
        }
    }

    #[test]
    fn accepts_complete_input() {
        let input = valid();
        let project = validate_create(&input).unwrap();
        assert_eq!(project.to_string(), input.project);
    }

    #[test]
    fn reports_every_missing_field() {
        let err = validate_create(&NewsInput::default()).unwrap_err();
        let NewsError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        for field in ["title", "project", "type", "content", "thumbnail"] {
            assert!(msg.contains(&format!("{} is required", field)), "{}", msg);
        }
    }

    #[test]
    fn rejects_bad_thumbnail_and_project() {
        let mut input = valid();
        input.thumbnail = "not a url".into();
        input.project = "abc".into();

        let NewsError::Validation(msg) = validate_create(&input).unwrap_err() else {
            panic!("expected validation error");
        };
        assert!(msg.contains("thumbnail must be"));
        assert!(msg.contains("project 'abc'"));

        input = valid();
        input.thumbnail = "ftp://example.com/a.png".into();
        assert!(validate_create(&input).is_err());
    }

    #[test]
    fn whitespace_title_is_missing() {
        let mut input = valid();
        input.title = "   ".into();
        assert!(validate_create(&input).is_err());
    }

    #[test]
    fn featured_must_be_a_url_when_set() {
        let mut input = valid();
        input.featured = Some("definitely not a url".into());
        let NewsError::Validation(msg) = validate_create(&input).unwrap_err() else {
            panic!("expected validation error");
        };
        assert!(msg.contains("featured must be"), "{}", msg);

        input.featured = Some("https://example.com/banner.png".into());
        assert!(validate_create(&input).is_ok());
        input.featured = Some(String::new());
        assert!(validate_create(&input).is_ok());

        let change = NewsInput {
            featured: Some("definitely not a url".into()),
            ..Default::default()
        };
        assert!(matches!(validate_update(&change), Err(NewsError::Validation(_))));
    }

    #[test]
    fn update_rejects_blank_required_fields() {
        for change in [
            NewsInput { title: "   ".into(), ..Default::default() },
            NewsInput { kind: "\t".into(), ..Default::default() },
            NewsInput { content: " \n ".into(), ..Default::default() },
        ] {
            let NewsError::Validation(msg) = validate_update(&change).unwrap_err() else {
                panic!("expected validation error");
            };
            assert!(msg.contains("must not be blank"), "{}", msg);
        }
    }

    #[test]
    fn update_only_checks_set_fields() {
        assert_eq!(validate_update(&NewsInput::default()).unwrap(), None);

        let input = NewsInput {
            thumbnail: "nope".into(),
            ..Default::default()
        };
        assert!(matches!(validate_update(&input), Err(NewsError::Validation(_))));

        let project = Uuid::new_v4();
        let input = NewsInput {
            project: project.to_string(),
            ..Default::default()
        };
        assert_eq!(validate_update(&input).unwrap(), Some(project));
    }
}
