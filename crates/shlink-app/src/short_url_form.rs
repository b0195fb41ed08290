//! Create short URL form state

use shlink_core::{ShortUrl, ShortUrlData};

/// Field of the form. `Title` is skipped on servers that don't store titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortUrlFormField {
    #[default]
    LongUrl,
    Title,
    Tags,
}

impl ShortUrlFormField {
    pub fn label(&self) -> &'static str {
        match self {
            ShortUrlFormField::LongUrl => "Long URL",
            ShortUrlFormField::Title => "Title",
            ShortUrlFormField::Tags => "Tags",
        }
    }

    /// Fields shown for a server, in focus order
    pub fn visible(supports_titles: bool) -> Vec<ShortUrlFormField> {
        if supports_titles {
            vec![
                ShortUrlFormField::LongUrl,
                ShortUrlFormField::Title,
                ShortUrlFormField::Tags,
            ]
        } else {
            vec![ShortUrlFormField::LongUrl, ShortUrlFormField::Tags]
        }
    }

    /// Field `delta` steps away, wrapping around the visible fields
    pub fn step(self, delta: isize, supports_titles: bool) -> Self {
        let fields = Self::visible(supports_titles);
        let current = fields.iter().position(|f| *f == self).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(fields.len() as isize) as usize;
        fields[next]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortUrlFormState {
    pub long_url: String,
    pub title: String,
    pub tags: Vec<String>,
    pub focus: ShortUrlFormField,
    /// A creation request is in flight
    pub saving: bool,
    /// Validation or server error from the last submit
    pub error: Option<String>,
    /// Result of the last successful submit
    pub created: Option<ShortUrl>,
}

impl ShortUrlFormState {
    /// Text of an editable field. Tags are edited through the tags selector.
    pub fn value(&self, field: ShortUrlFormField) -> &str {
        match field {
            ShortUrlFormField::LongUrl => &self.long_url,
            ShortUrlFormField::Title => &self.title,
            ShortUrlFormField::Tags => "",
        }
    }

    fn value_mut(&mut self, field: ShortUrlFormField) -> Option<&mut String> {
        match field {
            ShortUrlFormField::LongUrl => Some(&mut self.long_url),
            ShortUrlFormField::Title => Some(&mut self.title),
            ShortUrlFormField::Tags => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        let focus = self.focus;
        if let Some(value) = self.value_mut(focus) {
            value.push(c);
            self.error = None;
        }
    }

    pub fn pop_char(&mut self) {
        let focus = self.focus;
        if let Some(value) = self.value_mut(focus) {
            value.pop();
            self.error = None;
        }
    }

    /// Payload for the API. The title is left out when the server can't store it.
    pub fn data(&self, supports_titles: bool) -> ShortUrlData {
        ShortUrlData {
            long_url: self.long_url.clone(),
            tags: self.tags.clone(),
            title: Some(self.title.clone()).filter(|_| supports_titles),
        }
    }

    /// Empty form that remembers what was just created
    pub fn after_created(short_url: ShortUrl) -> Self {
        Self {
            created: Some(short_url),
            ..Self::default()
        }
    }
}
