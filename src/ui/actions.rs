//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

use super::routes::Route;

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Route),
    OpenGoTo,
    MoveSelectionUp,
    MoveSelectionDown,
    NextFilter,
    PrevFilter,
    Open, // Enter：打开列表项
    Back,

    // 管理操作
    StartCreate,
    StartEdit,
    StartDelete,
    Generate,
    Save,

    // 表单/通用交互
    NextField,
    PrevField,
    NextChoice,
    PrevChoice,
    Cancel,      // Esc / n
    Submit,      // Enter / y
    Input(char), // 输入字符
    Newline,
    DeleteChar, // Backspace
}
