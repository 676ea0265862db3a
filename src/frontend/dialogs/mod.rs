//! Dialog trait system for unified dialog management
//!
//! This module provides a generic trait-based system for dialogs in the application.
//! Each dialog implements the `Dialog` trait, encapsulating its state, actions, and rendering.

use egui::{Align2, Context, Ui};

/// Actions that a dialog can return after rendering
#[derive(Debug, Clone, Default)]
pub enum DialogAction<A> {
    /// Keep the dialog open, no action needed
    #[default]
    None,
    /// Close the dialog without performing any action
    Close,
    /// Close the dialog and perform the specified action
    CloseWithAction(A),
}

impl<A> DialogAction<A> {
    /// Check if the action indicates the dialog should close
    pub fn should_close(&self) -> bool {
        matches!(self, DialogAction::Close | DialogAction::CloseWithAction(_))
    }

    /// Extract the action if present
    pub fn into_action(self) -> Option<A> {
        match self {
            DialogAction::CloseWithAction(a) => Some(a),
            _ => None,
        }
    }
}

/// Trait for dialog state management
///
/// Dialog state structs should implement this trait to enable
/// proper lifecycle management (reset on close, validation, etc.)
pub trait DialogState: Default {
    /// Reset the dialog state to its default values
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check if the dialog has valid data to proceed with its action
    fn is_valid(&self) -> bool {
        true
    }
}

/// Configuration for dialog window appearance and behavior
#[derive(Debug, Clone)]
pub struct DialogWindowConfig {
    /// Default width of the dialog window
    pub default_width: f32,
    /// Whether the dialog can be resized
    pub resizable: bool,
    /// Whether the dialog can be collapsed
    pub collapsible: bool,
    /// Optional anchor position (alignment and offset)
    pub anchor: Option<(Align2, [f32; 2])>,
}

impl Default for DialogWindowConfig {
    fn default() -> Self {
        Self {
            default_width: 400.0,
            resizable: true,
            collapsible: false,
            anchor: None,
        }
    }
}

impl DialogWindowConfig {
    /// Create a centered, fixed-size dialog configuration
    pub fn centered(width: f32) -> Self {
        Self {
            default_width: width,
            resizable: false,
            collapsible: false,
            anchor: Some((Align2::CENTER_CENTER, [0.0, 0.0])),
        }
    }
}

/// Main dialog trait for implementing dialogs
///
/// Each dialog in the application should implement this trait.
/// The trait uses associated types for type-safe state, actions, and context.
///
/// # Example
///
/// ```ignore
/// pub struct MyDialogState { /* ... */ }
/// impl DialogState for MyDialogState { /* ... */ }
///
/// pub enum MyDialogAction { Save }
///
/// pub struct MyDialog;
///
/// impl Dialog for MyDialog {
///     type State = MyDialogState;
///     type Action = MyDialogAction;
///     type Context<'a> = &'a SomeData;
///
///     fn title(_state: &Self::State) -> String { t!("my_dialog").to_string() }
///
///     fn render(
///         state: &mut Self::State,
///         ctx: Self::Context<'_>,
///         ui: &mut Ui,
///     ) -> DialogAction<Self::Action> {
///         DialogAction::None
///     }
/// }
/// ```
pub trait Dialog {
    /// The state type for this dialog
    type State: DialogState;

    /// The action type this dialog can produce
    type Action;

    /// The context type needed to render this dialog
    type Context<'a>;

    /// Window title, translated at render time
    fn title(state: &Self::State) -> String;

    /// Get the window configuration for this dialog
    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::default()
    }

    /// Render the dialog content
    ///
    /// This method should render the dialog's UI and return an action
    /// indicating what should happen (close, perform action, etc.)
    fn render(
        state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action>;
}

/// Show a dialog using the Dialog trait
///
/// This helper function handles the common dialog lifecycle:
/// - Only renders if `is_open` is true
/// - Creates the window with the dialog's configuration
/// - Calls the dialog's render method
/// - Handles closing and state reset
///
/// Returns `Some(action)` if the dialog produced an action, `None` otherwise.
pub fn show_dialog<D: Dialog>(
    ctx: &Context,
    is_open: &mut bool,
    state: &mut D::State,
    dialog_ctx: D::Context<'_>,
) -> Option<D::Action> {
    if !*is_open {
        return None;
    }

    let config = D::window_config();
    let mut result = DialogAction::None;

    let mut window = egui::Window::new(D::title(state))
        .collapsible(config.collapsible)
        .resizable(config.resizable)
        .default_width(config.default_width);

    if let Some((align, offset)) = config.anchor {
        window = window.anchor(align, offset);
    }

    window.show(ctx, |ui| {
        result = D::render(state, dialog_ctx, ui);
    });

    if result.should_close() {
        *is_open = false;
        state.reset();
    }

    result.into_action()
}

pub mod error_message;
pub mod preferences;

pub use error_message::{ErrorMessageDialog, ErrorMessageState};
pub use preferences::{PreferencesAction, PreferencesContext, PreferencesDialog, PreferencesState};
