//! Short-link expansion.

use super::model::Link;

/// Replaces every occurrence of each link's short form with its expanded form.
///
/// Links are applied in order. If one short form is a substring of another the
/// earlier entry wins; the platform never emits overlapping short forms.
pub fn resolve<'a, I>(body: &str, links: I) -> String
where
    I: IntoIterator<Item = &'a Link>,
{
    links
        .into_iter()
        .filter(|link| !link.short.is_empty())
        .fold(body.to_string(), |text, link| {
            text.replace(&link.short, &link.expanded)
        })
}
