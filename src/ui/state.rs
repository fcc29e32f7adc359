//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use crate::generator::{ContentGenerator, GeminiModel, GenerationHandle, TextModel};
use crate::models::{Category, Post, PostDraft};
use crate::storage::{PostStore, StoreError};

use super::routes::Route;

/// 应用状态
///
/// `posts` 与 `current` 只是渲染用的副本，完整数据以仓库为准
pub struct App<'a, M = GeminiModel> {
    pub store: &'a mut PostStore,
    pub generator: &'a ContentGenerator<M>,
    pub route: Route,
    pub posts: Vec<Post>,
    pub current: Option<Post>,
    pub selected_index: usize,
    pub filter: Option<Category>, // None 表示全部
    pub mode: AppMode,
    pub input_buffer: String,
    pub editor: Option<EditorState>,
    pub contact: ContactForm,
    pub generation: Option<GenerationHandle>,
    pub message: Option<String>,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    GoTo,
    Confirm(ConfirmAction),
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    Delete(String),
}

/// 编辑器字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Category,
    Author,
    ImageUrl,
    Content,
    Excerpt,
}

impl EditorField {
    pub const ALL: [EditorField; 6] = [
        EditorField::Title,
        EditorField::Category,
        EditorField::Author,
        EditorField::ImageUrl,
        EditorField::Content,
        EditorField::Excerpt,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            EditorField::Title => "Title",
            EditorField::Category => "Category",
            EditorField::Author => "Author",
            EditorField::ImageUrl => "Image URL",
            EditorField::Content => "Content",
            EditorField::Excerpt => "Excerpt",
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, EditorField::Content | EditorField::Excerpt)
    }
}

/// 编辑器状态
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub draft: PostDraft,
    pub field: EditorField,
    pub error: Option<String>,
}

impl EditorState {
    pub fn new(draft: PostDraft) -> Self {
        Self {
            draft,
            field: EditorField::Title,
            error: None,
        }
    }

    /// 当前字段的文本；分类字段不是文本，返回 `None`
    pub fn field_mut(&mut self) -> Option<&mut String> {
        let draft = &mut self.draft;
        match self.field {
            EditorField::Title => Some(&mut draft.title),
            EditorField::Category => None,
            EditorField::Author => Some(&mut draft.author),
            EditorField::ImageUrl => Some(&mut draft.image_url),
            EditorField::Content => Some(&mut draft.content),
            EditorField::Excerpt => Some(&mut draft.excerpt),
        }
    }

    pub fn value(&self, field: EditorField) -> &str {
        let draft = &self.draft;
        match field {
            EditorField::Title => &draft.title,
            EditorField::Category => draft.category.as_str(),
            EditorField::Author => &draft.author,
            EditorField::ImageUrl => &draft.image_url,
            EditorField::Content => &draft.content,
            EditorField::Excerpt => &draft.excerpt,
        }
    }
}

/// 联系表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactField {
    #[default]
    Name,
    Email,
    Message,
}

/// 联系表单；提交只切换到确认页，不发送任何数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub field: ContactField,
    pub submitted: bool,
    pub error: Option<String>,
}

impl ContactForm {
    pub fn field_mut(&mut self) -> &mut String {
        match self.field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Message => &mut self.message,
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            ContactField::Name => ContactField::Email,
            ContactField::Email => ContactField::Message,
            ContactField::Message => ContactField::Name,
        };
    }

    pub fn prev_field(&mut self) {
        self.field = match self.field {
            ContactField::Name => ContactField::Message,
            ContactField::Email => ContactField::Name,
            ContactField::Message => ContactField::Email,
        };
    }

    pub fn submit(&mut self) {
        if [&self.name, &self.email, &self.message]
            .iter()
            .any(|v| v.trim().is_empty())
        {
            self.error = Some("All fields are required.".to_string());
            return;
        }
        if !self.email.contains('@') {
            self.error = Some("Please enter a valid email address.".to_string());
            return;
        }
        *self = Self {
            submitted: true,
            ..Self::default()
        };
    }
}

impl<'a, M: TextModel> App<'a, M> {
    /// 创建新的应用实例并进入初始路由
    pub fn new(
        store: &'a mut PostStore,
        generator: &'a ContentGenerator<M>,
        route: Route,
    ) -> Result<Self, StoreError> {
        let mut app = Self {
            store,
            generator,
            route: Route::Home,
            posts: Vec::new(),
            current: None,
            selected_index: 0,
            filter: None,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            editor: None,
            contact: ContactForm::default(),
            generation: None,
            message: None,
        };
        app.navigate(route)?;
        Ok(app)
    }

    /// 首页按分类过滤后的文章
    pub fn visible_posts(&self) -> Vec<&Post> {
        match (&self.route, self.filter) {
            (Route::Home, Some(category)) => {
                self.posts.iter().filter(|p| p.category == category).collect()
            }
            _ => self.posts.iter().collect(),
        }
    }

    /// 获取当前选中的文章
    pub fn selected_post(&self) -> Option<&Post> {
        self.visible_posts().get(self.selected_index).copied()
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_some()
    }

    /// 刷新列表并确保选中索引有效
    pub fn refresh_posts(&mut self) -> Result<(), StoreError> {
        self.posts = self.store.list()?;
        self.clamp_selection();
        Ok(())
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible_posts().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }
}
