//! 路由定义
//!
//! 与网页版路径一一对应，未匹配的路径回退到首页

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Post(String),
    About,
    Contact,
    Admin,
    AdminCreate,
    AdminEdit(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.trim().trim_start_matches('#');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["post", id] => Route::Post((*id).to_string()),
            ["about"] => Route::About,
            ["contact"] => Route::Contact,
            ["admin"] => Route::Admin,
            ["admin", "create"] => Route::AdminCreate,
            ["admin", "edit", id] => Route::AdminEdit((*id).to_string()),
            _ => Route::Home,
        }
    }

    pub fn is_editor(&self) -> bool {
        matches!(self, Route::AdminCreate | Route::AdminEdit(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Post(id) => write!(f, "/post/{id}"),
            Route::About => write!(f, "/about"),
            Route::Contact => write!(f, "/contact"),
            Route::Admin => write!(f, "/admin"),
            Route::AdminCreate => write!(f, "/admin/create"),
            Route::AdminEdit(id) => write!(f, "/admin/edit/{id}"),
        }
    }
}
