//! HTTP method as a typed enum.
//!
//! Only the RFC 9110 methods a JSON service answers are routable. Anything
//! else is rejected by the router with `405 Method Not Allowed` before it
//! reaches a handler.

use std::fmt;

/// A routable HTTP method.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delete  => "DELETE",
            Self::Get     => "GET",
            Self::Head    => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch   => "PATCH",
            Self::Post    => "POST",
            Self::Put     => "PUT",
        }
    }

    /// Maps hyper's method type onto a routable [`Method`].
    pub(crate) fn from_http(method: &http::Method) -> Option<Self> {
        match *method {
            http::Method::DELETE  => Some(Self::Delete),
            http::Method::GET     => Some(Self::Get),
            http::Method::HEAD    => Some(Self::Head),
            http::Method::OPTIONS => Some(Self::Options),
            http::Method::PATCH   => Some(Self::Patch),
            http::Method::POST    => Some(Self::Post),
            http::Method::PUT     => Some(Self::Put),
            _                     => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
