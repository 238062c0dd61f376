//! Author field format checks
//!
//! The accepted shape is `Surname, Given[, Patronymic]`, or several of those
//! joined by the word `and`:
//!
//! ```text
//! Ivanov, Ivan
//! Ivanov, Ivan, Ivanovich and Petrov, Petr
//! ```

/// Outcome of checking an author field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorFormat {
    Valid,
    /// Value is empty or whitespace only
    Empty,
    /// First author component that is not `Surname, Given`
    Malformed { component: String },
}

impl AuthorFormat {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Check the format of an author field value
pub fn check_author_format(value: &str) -> AuthorFormat {
    if value.trim().is_empty() {
        return AuthorFormat::Empty;
    }

    split_authors(value)
        .into_iter()
        .find(|component| !is_surname_given(component))
        .map_or(AuthorFormat::Valid, |component| AuthorFormat::Malformed {
            component,
        })
}

/// Split an author list on the word `and`, collapsing whitespace.
///
/// A leading, trailing or doubled `and` yields an empty component.
pub fn split_authors(value: &str) -> Vec<String> {
    let mut components: Vec<Vec<&str>> = vec![Vec::new()];
    for word in value.split_whitespace() {
        if word == "and" {
            components.push(Vec::new());
        } else if let Some(current) = components.last_mut() {
            current.push(word);
        }
    }
    components.into_iter().map(|words| words.join(" ")).collect()
}

/// Exactly two non-empty parts around the first comma
fn is_surname_given(component: &str) -> bool {
    match component.split_once(',') {
        Some((surname, given)) => !surname.trim().is_empty() && !given.trim().is_empty(),
        None => false,
    }
}
