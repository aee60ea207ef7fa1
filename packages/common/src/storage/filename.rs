/// Reasons a stored attachment name is refused.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    Empty,
    /// Contains `/` or `\`, or is `..`.
    Traversal,
    /// Starts with a dot.
    Hidden,
    /// Contains a NUL byte or another ASCII control character.
    ControlCharacter,
}

impl FilenameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "attachment name is empty",
            Self::Traversal => "attachment name must not contain directory components",
            Self::Hidden => "attachment name must not start with '.'",
            Self::ControlCharacter => "attachment name must not contain control characters",
        }
    }
}

/// Validates a single path segment naming a stored attachment.
///
/// Returns the trimmed name. Stored attachments always live directly in the
/// upload directory, so anything that could reach outside it is rejected.
pub fn validate_flat_filename(name: &str) -> Result<&str, FilenameError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }
    if trimmed == ".." || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(FilenameError::Traversal);
    }
    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    Ok(trimmed)
}
