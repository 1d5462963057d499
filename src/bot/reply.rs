use crate::bot::dialogue::State;

/// Reply keyboard attached to a text message.
#[derive(Debug, Clone, PartialEq)]
pub enum Keyboard {
    /// Rows of button labels
    Menu(Vec<Vec<String>>),
    /// Hide whatever keyboard the chat currently shows
    Remove,
}

impl Keyboard {
    /// Every button label, row by row.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Keyboard::Menu(rows) => rows.iter().flatten().map(String::as_str).collect(),
            Keyboard::Remove => Vec::new(),
        }
    }
}

/// A single message to send back to the chat.
#[derive(Debug, Clone, PartialEq)]
pub enum Outgoing {
    /// Plain text, optionally replacing the reply keyboard
    Text {
        /// Message body
        text: String,
        /// Keyboard to show with it, `None` keeps the current one
        keyboard: Option<Keyboard>,
    },
    /// Map pin
    Location {
        /// Degrees north
        latitude: f64,
        /// Degrees east
        longitude: f64,
    },
    /// In-memory file upload
    Document {
        /// Name shown to the user
        file_name: String,
        /// Text under the file
        caption: String,
        /// File contents
        bytes: Vec<u8>,
    },
}

impl Outgoing {
    /// Text that leaves the keyboard as is.
    pub fn text(text: impl Into<String>) -> Self {
        Outgoing::Text {
            text: text.into(),
            keyboard: None,
        }
    }

    /// Text with a new keyboard.
    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Outgoing::Text {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Result of handling one user input: the next dialogue state and what to send back.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State stored for the chat after this step
    pub next: State,
    /// Messages sent in order
    pub replies: Vec<Outgoing>,
}

impl Transition {
    /// Moves to `next` without replying.
    pub fn to(next: State) -> Self {
        Self {
            next,
            replies: Vec::new(),
        }
    }

    /// Appends a reply.
    pub fn reply(mut self, outgoing: Outgoing) -> Self {
        self.replies.push(outgoing);
        self
    }

    /// Appends a text reply.
    pub fn say(self, text: impl Into<String>) -> Self {
        self.reply(Outgoing::text(text))
    }

    /// Appends a text reply with a keyboard.
    pub fn say_with(self, text: impl Into<String>, keyboard: Keyboard) -> Self {
        self.reply(Outgoing::with_keyboard(text, keyboard))
    }

    /// Concatenated text of all text replies, handy for assertions and logs.
    pub fn text(&self) -> String {
        self.replies
            .iter()
            .filter_map(|reply| match reply {
                Outgoing::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Keyboard of the last text reply that carries one.
    pub fn keyboard(&self) -> Option<&Keyboard> {
        self.replies.iter().rev().find_map(|reply| match reply {
            Outgoing::Text { keyboard: Some(keyboard), .. } => Some(keyboard),
            _ => None,
        })
    }
}
