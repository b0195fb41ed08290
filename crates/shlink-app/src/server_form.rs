//! Create/edit server form state

use shlink_core::{Server, ServerData, ServerId};

/// Which server the form writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFormMode {
    Create,
    Edit(ServerId),
}

/// Editable field of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerFormField {
    #[default]
    Name,
    Url,
    ApiKey,
}

impl ServerFormField {
    pub const ALL: [ServerFormField; 3] = [
        ServerFormField::Name,
        ServerFormField::Url,
        ServerFormField::ApiKey,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServerFormField::Name => "Name",
            ServerFormField::Url => "URL",
            ServerFormField::ApiKey => "API key",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ServerFormField::Name => ServerFormField::Url,
            ServerFormField::Url => ServerFormField::ApiKey,
            ServerFormField::ApiKey => ServerFormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ServerFormField::Name => ServerFormField::ApiKey,
            ServerFormField::Url => ServerFormField::Name,
            ServerFormField::ApiKey => ServerFormField::Url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFormState {
    pub mode: ServerFormMode,
    pub data: ServerData,
    pub focus: ServerFormField,
    /// Validation message from the last submit
    pub error: Option<String>,
}

impl ServerFormState {
    pub fn create() -> Self {
        Self {
            mode: ServerFormMode::Create,
            data: ServerData::default(),
            focus: ServerFormField::Name,
            error: None,
        }
    }

    pub fn edit(server: &Server) -> Self {
        Self {
            mode: ServerFormMode::Edit(server.id.clone()),
            data: ServerData {
                name: server.name.clone(),
                url: server.url.to_string(),
                api_key: server.api_key.clone(),
            },
            focus: ServerFormField::Name,
            error: None,
        }
    }

    pub fn value(&self, field: ServerFormField) -> &str {
        match field {
            ServerFormField::Name => &self.data.name,
            ServerFormField::Url => &self.data.url,
            ServerFormField::ApiKey => &self.data.api_key,
        }
    }

    fn value_mut(&mut self, field: ServerFormField) -> &mut String {
        match field {
            ServerFormField::Name => &mut self.data.name,
            ServerFormField::Url => &mut self.data.url,
            ServerFormField::ApiKey => &mut self.data.api_key,
        }
    }

    pub fn push_char(&mut self, c: char) {
        let focus = self.focus;
        self.value_mut(focus).push(c);
        self.error = None;
    }

    pub fn pop_char(&mut self) {
        let focus = self.focus;
        self.value_mut(focus).pop();
        self.error = None;
    }
}
