//! Server-rendered inbox page

use std::fmt::Write;

use crate::auth::SessionIdentity;
use crate::storage::messages::{self, JOIN_REQUEST};

/// Data shown on the inbox page
pub struct MessagesPage<'a> {
    pub viewer: &'a SessionIdentity,
    pub messages: &'a [messages::Model],
    pub user_names: &'a [String],
}

impl MessagesPage<'_> {
    pub fn render(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Messages</title></head>\n<body>\n");
        let _ = writeln!(html, "<h1>Messages for {}</h1>", escape(&self.viewer.name));

        if self.messages.is_empty() {
            html.push_str("<p class=\"empty\">No messages.</p>\n");
        } else {
            html.push_str("<ul class=\"messages\">\n");
            for message in self.messages {
                let _ = write!(
                    html,
                    "<li class=\"message\" data-id=\"{}\" data-type=\"{}\" data-sender-id=\"{}\">\
                     <h2>{}</h2><p class=\"from\">From {}</p><p class=\"body\">{}</p>",
                    message.id,
                    escape(&message.kind),
                    message.sender_id,
                    escape(&message.subject),
                    escape(&message.sender_name),
                    escape(&message.body),
                );
                if message.kind == JOIN_REQUEST {
                    let _ = write!(
                        html,
                        "<button class=\"accept-join\" data-id=\"{}\">Accept</button>",
                        message.id
                    );
                }
                let _ = writeln!(
                    html,
                    "<button class=\"delete-message\" data-id=\"{}\">Delete</button></li>",
                    message.id
                );
            }
            html.push_str("</ul>\n");
        }

        html.push_str("<datalist id=\"users\">\n");
        for name in self.user_names {
            let _ = writeln!(html, "<option value=\"{}\">", escape(name));
        }
        html.push_str("</datalist>\n</body>\n</html>\n");
        html
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
