use std::fmt;
use url::Url;

/// Base used to resolve relative navigation targets.
const APP_BASE: &str = "app://chatgate/";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    ForgotPassword,
    ResetPassword,
    VerifyOtp,
    VerifyPending,
    Chat,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Signup,
        Route::ForgotPassword,
        Route::ResetPassword,
        Route::VerifyOtp,
        Route::VerifyPending,
        Route::Chat,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::ForgotPassword => "/forgot-password",
            Self::ResetPassword => "/reset-password",
            Self::VerifyOtp => "/verify-otp",
            Self::VerifyPending => "/verify-pending",
            Self::Chat => "/chat",
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim().trim_end_matches('/');
        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A navigation target: route plus query parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    route: Route,
    query: Vec<(String, String)>,
}

impl Location {
    #[must_use]
    pub fn new(route: Route) -> Self {
        Self {
            route,
            query: Vec::new(),
        }
    }

    /// Parses a path (`/reset-password?token=XYZ`) or a full link. The root
    /// and unknown paths land on Login.
    #[must_use]
    pub fn parse(target: &str) -> Self {
        let Ok(url) = Url::parse(APP_BASE).and_then(|base| base.join(target.trim())) else {
            return Self::new(Route::Login);
        };

        Self {
            route: Route::from_path(url.path()).unwrap_or(Route::Login),
            query: url
                .query_pairs()
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn route(&self) -> Route {
        self.route
    }

    /// First non-empty value for `key`.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }
}

impl From<Route> for Location {
    fn from(route: Route) -> Self {
        Self::new(route)
    }
}
