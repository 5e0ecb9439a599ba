/*!
 * Completion suggestions
 */

/// One completion candidate: the text to insert plus what kind of object it names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub category: SuggestionCategory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestionCategory {
    Table,
    Column,
}

impl Suggestion {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            text: name.into(),
            category: SuggestionCategory::Table,
        }
    }

    pub fn column(name: impl Into<String>) -> Self {
        Self {
            text: name.into(),
            category: SuggestionCategory::Column,
        }
    }

    /// Text shown in the candidate list, e.g. `users - table`.
    pub fn format_display(&self) -> String {
        format!("{} - {}", self.text, self.category.label())
    }
}

impl SuggestionCategory {
    pub fn label(self) -> &'static str {
        match self {
            SuggestionCategory::Table => "table",
            SuggestionCategory::Column => "column",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_the_category_label() {
        assert_eq!(Suggestion::table("users").format_display(), "users - table");
        assert_eq!(Suggestion::column("email").format_display(), "email - column");
    }
}
