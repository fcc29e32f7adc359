//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use chrono::Utc;
use tracing::{info, warn};

use super::actions::Action;
use super::routes::Route;
use super::state::{
    App, AppMode, ConfirmAction, ContactField, ContactForm, EditorField, EditorState,
};
use crate::generator::{GenerateError, TextModel};
use crate::models::{Category, PostDraft};
use crate::storage::StoreError;

impl<M: TextModel> App<'_, M> {
    /// 核心逻辑分发；返回 `true` 表示退出
    pub fn dispatch(&mut self, action: Action) -> Result<bool, StoreError> {
        match action {
            Action::Quit => return Ok(true),
            Action::Navigate(route) => self.navigate(route)?,
            Action::OpenGoTo => self.start_goto(),
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),
            Action::NextFilter => self.cycle_filter(true),
            Action::PrevFilter => self.cycle_filter(false),
            Action::Open => self.open_selected()?,
            Action::Back => self.back()?,

            Action::StartCreate => self.navigate(Route::AdminCreate)?,
            Action::StartEdit => {
                if let Some(id) = self.selected_post().map(|p| p.id.clone()) {
                    self.navigate(Route::AdminEdit(id))?;
                }
            }
            Action::StartDelete => self.start_delete(),
            Action::Generate => self.start_generate(),
            Action::Save => self.save_editor()?,

            Action::NextField => self.next_field(),
            Action::PrevField => self.prev_field(),
            Action::NextChoice => self.cycle_category(true),
            Action::PrevChoice => self.cycle_category(false),

            Action::Cancel => self.cancel()?,
            Action::Submit => self.submit()?,
            Action::Input(c) => self.input_char(c),
            Action::Newline => self.input_newline(),
            Action::DeleteChar => self.delete_char(),
        }
        Ok(false)
    }

    // ============ 路由相关 ============

    /// 进入路由并加载该页面需要的数据
    pub fn navigate(&mut self, route: Route) -> Result<(), StoreError> {
        // 离开编辑器时丢弃进行中的生成请求
        if let Some(handle) = self.generation.take() {
            handle.abort();
            info!("abandoned in-flight generation");
        }
        self.mode = AppMode::Normal;
        self.current = None;
        self.editor = None;

        match &route {
            Route::Home | Route::Admin => {
                if self.route != route {
                    self.selected_index = 0;
                }
                self.refresh_posts()?;
            }
            Route::Post(id) => {
                self.current = self.store.get(id)?;
            }
            Route::About => {}
            Route::Contact => self.contact = ContactForm::default(),
            Route::AdminCreate => {
                self.editor = Some(EditorState::new(PostDraft::new(Utc::now())));
            }
            Route::AdminEdit(id) => match self.store.get(id)? {
                Some(post) => self.editor = Some(EditorState::new(PostDraft::from_post(&post))),
                None => {
                    warn!(%id, "edit requested for missing post");
                    self.message = Some(format!("Post {id} not found"));
                    return self.navigate(Route::Admin);
                }
            },
        }

        self.route = route;
        Ok(())
    }

    fn back(&mut self) -> Result<(), StoreError> {
        match self.route {
            Route::Post(_) => self.navigate(Route::Home),
            Route::AdminCreate | Route::AdminEdit(_) => self.navigate(Route::Admin),
            _ => Ok(()),
        }
    }

    fn start_goto(&mut self) {
        self.mode = AppMode::GoTo;
        self.input_buffer = "/".to_string();
    }

    // ============ 列表相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.visible_posts().len() {
            self.selected_index += 1;
        }
    }

    /// 切换首页分类过滤：All → Technology → … → Business → All
    fn cycle_filter(&mut self, forward: bool) {
        if self.route != Route::Home {
            return;
        }
        let mut options = vec![None];
        options.extend(Category::ALL.map(Some));
        let idx = options.iter().position(|f| *f == self.filter).unwrap_or(0);
        let len = options.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.filter = options[next];
        self.selected_index = 0;
    }

    fn open_selected(&mut self) -> Result<(), StoreError> {
        let Some(id) = self.selected_post().map(|p| p.id.clone()) else {
            return Ok(());
        };
        match self.route {
            Route::Home => self.navigate(Route::Post(id)),
            Route::Admin => self.navigate(Route::AdminEdit(id)),
            _ => Ok(()),
        }
    }

    // ============ 删除相关 ============

    fn start_delete(&mut self) {
        if let Some(id) = self.selected_post().map(|p| p.id.clone()) {
            self.mode = AppMode::Confirm(ConfirmAction::Delete(id));
        }
    }

    /// 执行确认操作
    fn execute_confirm(&mut self) -> Result<(), StoreError> {
        if let AppMode::Confirm(ConfirmAction::Delete(id)) = &self.mode {
            let id = id.clone();
            self.store.delete(&id)?;
            info!(%id, "post deleted");
            self.message = Some("Post deleted".to_string());
        }
        self.mode = AppMode::Normal;
        self.refresh_posts()
    }

    // ============ 编辑器相关 ============

    fn next_field(&mut self) {
        if let Some(editor) = &mut self.editor {
            editor.field = editor.field.next();
        } else if self.route == Route::Contact {
            self.contact.next_field();
        }
    }

    fn prev_field(&mut self) {
        if let Some(editor) = &mut self.editor {
            editor.field = editor.field.prev();
        } else if self.route == Route::Contact {
            self.contact.prev_field();
        }
    }

    fn cycle_category(&mut self, forward: bool) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        if editor.field == EditorField::Category {
            let current = editor.draft.category;
            editor.draft.category = if forward { current.next() } else { current.prev() };
        }
    }

    /// 启动 AI 生成；前置条件失败时直接在编辑器中显示错误
    pub fn start_generate(&mut self) {
        if self.is_generating() {
            return;
        }
        let Some(editor) = &mut self.editor else {
            return;
        };
        match self.generator.start(&editor.draft.title, editor.draft.category) {
            Ok(handle) => {
                editor.error = None;
                self.generation = Some(handle);
                self.message = Some("Generating...".to_string());
            }
            Err(GenerateError::EmptyTitle) => {
                editor.error =
                    Some("Please provide a Title and Category to generate content.".to_string());
            }
            Err(err) => editor.error = Some(err.to_string()),
        }
    }

    /// 检查生成结果；由主循环在每次等待输入之间调用
    pub fn poll_generation(&mut self) {
        let Some(handle) = &mut self.generation else {
            return;
        };
        let Some(result) = handle.try_result() else {
            return;
        };
        self.generation = None;
        self.message = None;

        let Some(editor) = &mut self.editor else {
            return;
        };
        match result {
            Ok(text) => {
                editor.draft.apply_generated(&text);
                editor.error = None;
                self.message = Some("Content generated".to_string());
            }
            Err(err) => {
                editor.error = Some(format!("Failed to generate content: {err}"));
            }
        }
    }

    /// 保存编辑器内容并返回管理页
    pub fn save_editor(&mut self) -> Result<(), StoreError> {
        let Some(editor) = &mut self.editor else {
            return Ok(());
        };
        match editor.draft.clone().into_post(Utc::now()) {
            Ok(post) => {
                let created = !editor.draft.is_editing();
                info!(id = %post.id, created, "saving post");
                self.store.save(post)?;
                self.message = Some(if created { "Post created" } else { "Post updated" }.to_string());
                self.navigate(Route::Admin)
            }
            Err(err) => {
                editor.error = Some(err.to_string());
                Ok(())
            }
        }
    }

    // ============ 输入相关 ============

    fn input_char(&mut self, c: char) {
        if self.mode == AppMode::GoTo {
            self.input_buffer.push(c);
        } else if let Some(editor) = &mut self.editor {
            if let Some(value) = editor.field_mut() {
                value.push(c);
            }
        } else if self.route == Route::Contact && !self.contact.submitted {
            self.contact.field_mut().push(c);
        }
    }

    fn input_newline(&mut self) {
        if let Some(editor) = &mut self.editor {
            if editor.field.is_multiline() {
                if let Some(value) = editor.field_mut() {
                    value.push('\n');
                }
            } else {
                editor.field = editor.field.next();
            }
        }
    }

    fn delete_char(&mut self) {
        if self.mode == AppMode::GoTo {
            self.input_buffer.pop();
        } else if let Some(editor) = &mut self.editor {
            if let Some(value) = editor.field_mut() {
                value.pop();
            }
        } else if self.route == Route::Contact && !self.contact.submitted {
            self.contact.field_mut().pop();
        }
    }

    fn submit(&mut self) -> Result<(), StoreError> {
        match &self.mode {
            AppMode::GoTo => {
                let route = Route::parse(&self.input_buffer);
                self.input_buffer.clear();
                self.navigate(route)
            }
            AppMode::Confirm(_) => self.execute_confirm(),
            AppMode::Normal if self.route == Route::Contact => {
                if self.contact.submitted {
                    self.contact = ContactForm::default();
                } else if self.contact.field == ContactField::Message {
                    self.contact.submit();
                } else {
                    self.contact.next_field();
                }
                Ok(())
            }
            AppMode::Normal => Ok(()),
        }
    }

    // ============ 通用操作 ============

    /// 取消当前操作
    pub fn cancel(&mut self) -> Result<(), StoreError> {
        match self.mode {
            AppMode::GoTo | AppMode::Confirm(_) => {
                self.mode = AppMode::Normal;
                self.input_buffer.clear();
                Ok(())
            }
            AppMode::Normal if self.route.is_editor() => self.navigate(Route::Admin),
            AppMode::Normal if self.route == Route::Contact => self.navigate(Route::Home),
            AppMode::Normal => {
                self.message = None;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use reqwest::StatusCode;

    use crate::generator::ContentGenerator;
    use crate::storage::PostStore;

    fn seeded_store() -> PostStore {
        let mut store = PostStore::in_memory();
        store.ensure_seeded().unwrap();
        store
    }

    fn offline_generator() -> ContentGenerator {
        ContentGenerator::new(None, Default::default())
    }

    #[derive(Clone, Copy)]
    enum Script {
        Reply,
        Fail,
        Hang,
    }

    /// 按预设剧本应答的模型
    struct ScriptedModel(Script);

    impl TextModel for ScriptedModel {
        async fn generate_text(
            &self,
            _api_key: &str,
            _prompt: &str,
        ) -> Result<Option<String>, GenerateError> {
            match self.0 {
                Script::Reply => Ok(Some("x".repeat(200))),
                Script::Fail => Err(GenerateError::Provider {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: "overloaded".to_string(),
                }),
                Script::Hang => std::future::pending().await,
            }
        }
    }

    fn scripted_generator(script: Script) -> ContentGenerator<ScriptedModel> {
        ContentGenerator::new(Some("key".to_string()), ScriptedModel(script))
    }

    /// 轮询直到生成任务结束
    async fn settle<M: TextModel>(app: &mut App<'_, M>) {
        while app.is_generating() {
            tokio::time::sleep(Duration::from_millis(5)).await;
            app.poll_generation();
        }
    }

    fn type_text<M: TextModel>(app: &mut App<'_, M>, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Input(c)).unwrap();
        }
    }

    #[test]
    fn test_home_lists_seed_posts() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let app = App::new(&mut store, &generator, Route::Home).unwrap();
        assert_eq!(app.visible_posts().len(), 3);
        assert_eq!(app.selected_post().unwrap().id, "1");
    }

    #[test]
    fn test_filter_by_category() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let mut app = App::new(&mut store, &generator, Route::Home).unwrap();

        app.dispatch(Action::NextFilter).unwrap();
        assert_eq!(app.filter, Some(Category::Technology));
        assert_eq!(app.visible_posts().len(), 1);

        app.dispatch(Action::NextFilter).unwrap();
        assert_eq!(app.filter, Some(Category::Lifestyle));
        assert_eq!(app.selected_post().unwrap().id, "3");

        app.dispatch(Action::PrevFilter).unwrap();
        app.dispatch(Action::PrevFilter).unwrap();
        assert_eq!(app.filter, None);
    }

    #[test]
    fn test_open_post_and_back() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let mut app = App::new(&mut store, &generator, Route::Home).unwrap();

        app.dispatch(Action::MoveSelectionDown).unwrap();
        app.dispatch(Action::Open).unwrap();
        assert_eq!(app.route, Route::Post("2".to_string()));
        assert_eq!(app.current.as_ref().unwrap().author, "Sarah Jenkins");

        app.dispatch(Action::Back).unwrap();
        assert_eq!(app.route, Route::Home);
    }

    #[test]
    fn test_missing_post_detail_is_empty() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let app = App::new(&mut store, &generator, Route::Post("404".to_string())).unwrap();
        assert!(app.current.is_none());
    }

    #[test]
    fn test_goto_prompt() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let mut app = App::new(&mut store, &generator, Route::Home).unwrap();

        app.dispatch(Action::OpenGoTo).unwrap();
        type_text(&mut app, "admin");
        app.dispatch(Action::Submit).unwrap();
        assert_eq!(app.route, Route::Admin);

        app.dispatch(Action::OpenGoTo).unwrap();
        type_text(&mut app, "bogus");
        app.dispatch(Action::Submit).unwrap();
        assert_eq!(app.route, Route::Home);
    }

    #[test]
    fn test_delete_with_confirmation() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let mut app = App::new(&mut store, &generator, Route::Admin).unwrap();

        app.dispatch(Action::MoveSelectionDown).unwrap();
        app.dispatch(Action::StartDelete).unwrap();
        assert_eq!(app.mode, AppMode::Confirm(ConfirmAction::Delete("2".to_string())));

        app.dispatch(Action::Cancel).unwrap();
        assert_eq!(app.posts.len(), 3);

        app.dispatch(Action::StartDelete).unwrap();
        app.dispatch(Action::Submit).unwrap();
        let ids: Vec<_> = app.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        drop(app);
        assert!(store.get("2").unwrap().is_none());
    }

    #[test]
    fn test_create_post_flow() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let mut app = App::new(&mut store, &generator, Route::Admin).unwrap();

        app.dispatch(Action::StartCreate).unwrap();
        assert_eq!(app.route, Route::AdminCreate);

        // 缺少必填字段时停留在编辑器
        app.dispatch(Action::Save).unwrap();
        assert_eq!(app.route, Route::AdminCreate);
        assert_eq!(
            app.editor.as_ref().unwrap().error.as_deref(),
            Some("Please fill in all required fields.")
        );

        type_text(&mut app, "Street Food");
        app.dispatch(Action::NextField).unwrap();
        app.dispatch(Action::NextChoice).unwrap();
        app.dispatch(Action::NextChoice).unwrap();
        app.dispatch(Action::NextChoice).unwrap();
        app.dispatch(Action::NextField).unwrap();
        type_text(&mut app, "Kim");
        app.dispatch(Action::NextField).unwrap();
        app.dispatch(Action::NextField).unwrap();
        type_text(&mut app, "Line one");
        app.dispatch(Action::Newline).unwrap();
        type_text(&mut app, "Line two");
        app.dispatch(Action::Save).unwrap();

        assert_eq!(app.route, Route::Admin);
        let first = &app.posts[0];
        assert_eq!(first.title, "Street Food");
        assert_eq!(first.category, Category::Food);
        assert_eq!(first.author, "Kim");
        assert_eq!(first.content, "Line one\nLine two");
        assert_eq!(app.posts.len(), 4);
    }

    #[test]
    fn test_edit_keeps_position() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let mut app = App::new(&mut store, &generator, Route::AdminEdit("2".to_string())).unwrap();

        type_text(&mut app, "!");
        app.dispatch(Action::Save).unwrap();

        assert_eq!(app.posts.len(), 3);
        assert_eq!(app.posts[1].id, "2");
        assert_eq!(app.posts[1].title, "Top 10 Travel Destinations for 2024!");
    }

    #[test]
    fn test_edit_missing_redirects_to_dashboard() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let app = App::new(&mut store, &generator, Route::AdminEdit("404".to_string())).unwrap();
        assert_eq!(app.route, Route::Admin);
        assert!(app.editor.is_none());
    }

    #[test]
    fn test_generate_without_key_shows_error() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let mut app = App::new(&mut store, &generator, Route::AdminCreate).unwrap();
        type_text(&mut app, "Night Markets");

        app.dispatch(Action::Generate).unwrap();
        assert!(!app.is_generating());
        let error = app.editor.as_ref().unwrap().error.clone().unwrap();
        assert!(error.contains("API key is missing"));
    }

    #[test]
    fn test_generate_with_empty_title_asks_for_title() {
        // 标题先于 API key 检查
        let mut store = seeded_store();
        let generator = offline_generator();
        let mut app = App::new(&mut store, &generator, Route::AdminCreate).unwrap();

        app.dispatch(Action::Generate).unwrap();
        assert!(!app.is_generating());
        assert_eq!(
            app.editor.as_ref().unwrap().error.as_deref(),
            Some("Please provide a Title and Category to generate content.")
        );
    }

    #[tokio::test]
    async fn test_generated_text_fills_editor() {
        let mut store = seeded_store();
        let generator = scripted_generator(Script::Reply);
        let mut app = App::new(&mut store, &generator, Route::AdminCreate).unwrap();
        type_text(&mut app, "Night Markets");

        app.dispatch(Action::Generate).unwrap();
        assert!(app.is_generating());
        settle(&mut app).await;

        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.draft.content, "x".repeat(200));
        assert_eq!(editor.draft.excerpt, format!("{}...", "x".repeat(150)));
        assert_eq!(editor.error, None);
        assert_eq!(app.message.as_deref(), Some("Content generated"));
    }

    #[tokio::test]
    async fn test_generation_failure_reaches_editor() {
        let mut store = seeded_store();
        let generator = scripted_generator(Script::Fail);
        let mut app = App::new(&mut store, &generator, Route::AdminCreate).unwrap();
        type_text(&mut app, "Night Markets");

        app.dispatch(Action::Generate).unwrap();
        settle(&mut app).await;

        let editor = app.editor.as_ref().unwrap();
        let error = editor.error.as_deref().unwrap();
        assert!(error.starts_with("Failed to generate content: provider returned 500"));
        assert!(error.contains("overloaded"));
        assert!(editor.draft.content.is_empty());
        assert!(editor.draft.excerpt.is_empty());
    }

    #[tokio::test]
    async fn test_leaving_editor_drops_generation() {
        let mut store = seeded_store();
        let generator = scripted_generator(Script::Hang);
        let mut app = App::new(&mut store, &generator, Route::AdminCreate).unwrap();
        type_text(&mut app, "Night Markets");

        app.dispatch(Action::Generate).unwrap();
        assert!(app.is_generating());
        app.dispatch(Action::Cancel).unwrap();
        assert_eq!(app.route, Route::Admin);
        assert!(!app.is_generating());

        app.poll_generation();
        assert!(app.editor.is_none());
    }

    #[test]
    fn test_cancel_editor_returns_to_dashboard() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let mut app = App::new(&mut store, &generator, Route::AdminCreate).unwrap();
        type_text(&mut app, "Draft");
        app.dispatch(Action::Cancel).unwrap();
        assert_eq!(app.route, Route::Admin);
        assert_eq!(app.posts.len(), 3);
    }

    #[test]
    fn test_contact_form() {
        let mut store = seeded_store();
        let generator = offline_generator();
        let mut app = App::new(&mut store, &generator, Route::Contact).unwrap();

        type_text(&mut app, "Ann");
        app.dispatch(Action::Submit).unwrap();
        type_text(&mut app, "ann@example.com");
        app.dispatch(Action::Submit).unwrap();
        app.dispatch(Action::Submit).unwrap();
        assert!(!app.contact.submitted);
        assert!(app.contact.error.is_some());

        type_text(&mut app, "Hello!");
        app.dispatch(Action::Submit).unwrap();
        assert!(app.contact.submitted);
        assert!(app.contact.name.is_empty());

        app.dispatch(Action::Submit).unwrap();
        assert!(!app.contact.submitted);
    }
}
