use serde_json::Value;
use tauri::{
    AppHandle, Manager, Runtime, WebviewUrl, WebviewWindow, WebviewWindowBuilder, Window,
    WindowEvent, Wry,
};

use crate::background::BackgroundType;
use crate::config::Config;
use crate::effects;
use crate::error::Result;
use crate::message_box::{self, MessageBox, MessageBoxRegistry};
use crate::platform::Environment;
use crate::script;

pub const MAIN_WINDOW_LABEL: &str = "main";

/// Callback run once the main window is up and its background applied.
pub type StartupFn = Box<dyn FnOnce(FluentHandle) + Send + 'static>;

/// A webview window with a fluent background.
///
/// The background is resolved against the host when the value is created, so
/// [`FluentWebView::background_type`] never reports an `Auto*` variant.
pub struct FluentWebView {
    title: String,
    url: String,
    background_type: BackgroundType,
    debug: bool,
    width: f64,
    height: f64,
    resizable: bool,
    startup_function: Option<StartupFn>,
}

impl FluentWebView {
    pub fn new(title: impl Into<String>, background_type: BackgroundType) -> Self {
        Self::with_environment(title, background_type, &Environment::detect())
    }

    pub fn with_environment(
        title: impl Into<String>,
        background_type: BackgroundType,
        env: &Environment,
    ) -> Self {
        let resolved = background_type.resolve(env);
        if resolved != background_type {
            log::info!("Resolved {} background to {}", background_type, resolved);
        }
        Self {
            title: title.into(),
            url: "index.html".to_string(),
            background_type: resolved,
            debug: false,
            width: 900.0,
            height: 600.0,
            resizable: true,
            startup_function: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.title.clone(), config.background_type)
            .url(config.url.clone())
            .size(config.width, config.height)
            .debug(config.debug)
    }

    /// Page of the bundled frontend, or an `http(s)` address.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Enables devtools and logs every evaluated script.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Runs `f` on its own thread after the window is initialized, so it may
    /// block on [`FluentHandle::message_box`].
    pub fn on_startup<F>(mut self, f: F) -> Self
    where
        F: FnOnce(FluentHandle) + Send + 'static,
    {
        self.startup_function = Some(Box::new(f));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn background_type(&self) -> BackgroundType {
        self.background_type
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Runs the event loop until the application exits.
    pub fn start(self, context: tauri::Context<Wry>) -> Result<()> {
        tauri::Builder::default()
            .manage(MessageBoxRegistry::new())
            .invoke_handler(tauri::generate_handler![
                crate::message_box::message_box_result,
                crate::app_log::frontend_log
            ])
            .setup(move |app| {
                self.init(app.handle())?;
                Ok(())
            })
            .on_window_event(handle_window_event)
            .run(context)?;
        Ok(())
    }

    fn init(self, app: &AppHandle) -> Result<()> {
        let window = self.build_main_window(app)?;

        if let Err(e) = effects::apply(&window, self.background_type, &self.title) {
            log::error!("Failed to apply {} background: {}", self.background_type, e);
        }

        let handle = FluentHandle {
            app: app.clone(),
            window,
            title: self.title,
            background_type: self.background_type,
            debug: self.debug,
        };

        if let Some(startup) = self.startup_function {
            std::thread::Builder::new()
                .name("fluent-startup".to_string())
                .spawn(move || startup(handle))?;
        }
        Ok(())
    }

    fn build_main_window(&self, app: &AppHandle) -> Result<WebviewWindow> {
        let mut builder = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, webview_url(&self.url))
            .title(&self.title)
            .inner_size(self.width, self.height)
            .resizable(self.resizable)
            .transparent(self.background_type.is_transparent())
            .devtools(self.debug);
        if let Some(script) = effects::fake_mica_script(self.background_type) {
            builder = builder.initialization_script(&script);
        }
        Ok(builder.build()?)
    }
}

/// Closing a message box window without answering cancels it.
pub fn handle_window_event<R: Runtime>(window: &Window<R>, event: &WindowEvent) {
    if let WindowEvent::Destroyed = event {
        if let Some(registry) = window.try_state::<MessageBoxRegistry>() {
            if message_box::on_window_destroyed(&registry, window.label()) {
                log::info!("Message box `{}` closed without an answer", window.label());
            }
        }
    }
}

/// `http(s)` addresses load as-is, anything else is a bundled page.
pub fn webview_url(url: &str) -> WebviewUrl {
    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => WebviewUrl::External(parsed),
        _ => WebviewUrl::App(url.into()),
    }
}

/// Handle to a running [`FluentWebView`], handed to the startup callback.
#[derive(Clone)]
pub struct FluentHandle {
    app: AppHandle,
    window: WebviewWindow,
    title: String,
    background_type: BackgroundType,
    debug: bool,
}

impl FluentHandle {
    /// Calls `function_name(args...)` in `window`, or in the main window when
    /// `None`.
    pub fn evaluate_js(
        &self,
        function_name: &str,
        args: &[Value],
        window: Option<&WebviewWindow>,
    ) -> Result<()> {
        let javascript = script::build_call(function_name, args);
        if self.debug {
            log::debug!("{}", javascript);
        }
        window.unwrap_or(&self.window).eval(&javascript)?;
        Ok(())
    }

    /// Shows a message box and returns whether the primary button was clicked.
    /// Blocks until the user answers or closes the box.
    pub fn message_box(&self, message_box: &MessageBox) -> Result<bool> {
        message_box::show(&self.app, &self.title, message_box, self.debug)
    }

    pub fn window(&self) -> &WebviewWindow {
        &self.window
    }

    pub fn app_handle(&self) -> &AppHandle {
        &self.app
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn background_type(&self) -> BackgroundType {
        self.background_type
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}
