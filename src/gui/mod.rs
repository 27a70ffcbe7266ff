use crate::{
    api::AttendanceApi,
    config::Config,
    screens::{Notification, NotificationLevel, Screen},
};
use gtk::prelude::*;
use gtk::{
    Application, ApplicationWindow, ButtonsType, CssProvider, DialogFlags, EventControllerKey,
    MessageDialog, MessageType,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub mod home;
pub mod login;
pub mod register;

const APP_ID: &str = "com.studentmonitoring.AttendanceScanner";

const CSS: &str = "
button.primary { background: #007bff; color: white; }
button.register { background: #4CAF50; color: white; }
button.entry { background: green; color: white; }
button.exit { background: red; color: white; }
button.scan-again { background: blue; color: white; }
label.card { background: lightgray; color: black; padding: 30px; border-radius: 10px; font-size: 26px; }
";

/// Something a screen hooked into the window that has to be undone when
/// another screen replaces it.
enum Mounted {
    KeyController(EventControllerKey),
    Source(glib::SourceId),
    StopFlag(Arc<AtomicBool>),
}

/// Swaps screens in and out of the main window and hands them the shared
/// config and backend client.
#[derive(Clone)]
pub struct Navigator {
    window: ApplicationWindow,
    config: Rc<Config>,
    api: Arc<dyn AttendanceApi>,
    mounted: Rc<RefCell<Vec<Mounted>>>,
}

impl Navigator {
    fn new(window: ApplicationWindow, config: Rc<Config>, api: Arc<dyn AttendanceApi>) -> Self {
        Navigator {
            window,
            config,
            api,
            mounted: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> Arc<dyn AttendanceApi> {
        Arc::clone(&self.api)
    }

    pub fn show(&self, screen: Screen) {
        info!(?screen, "navigating");
        self.unmount();

        let child = match screen {
            Screen::Login => login::login_widget(self.clone()),
            Screen::Register => register::register_widget(self.clone()),
            Screen::Home => home::home_widget(self.clone()),
        };
        self.window.set_child(Some(&child));
    }

    fn unmount(&self) {
        for mounted in self.mounted.borrow_mut().drain(..) {
            match mounted {
                Mounted::KeyController(controller) => self.window.remove_controller(&controller),
                // Workers still sending afterwards get an error and give up.
                Mounted::Source(source) => glib::source_remove(source),
                // Readers sitting on an idle port see this on their next read
                // timeout.
                Mounted::StopFlag(stop) => stop.store(true, Ordering::Relaxed),
            }
        }
    }

    pub fn add_key_controller(&self, controller: EventControllerKey) {
        self.window.add_controller(&controller);
        self.mounted
            .borrow_mut()
            .push(Mounted::KeyController(controller));
    }

    pub fn own_source(&self, source: glib::SourceId) {
        self.mounted.borrow_mut().push(Mounted::Source(source));
    }

    /// A flag that is raised when the current screen is replaced.
    pub fn stop_on_unmount(&self) -> Arc<AtomicBool> {
        let stop = Arc::new(AtomicBool::new(false));
        self.mounted
            .borrow_mut()
            .push(Mounted::StopFlag(Arc::clone(&stop)));
        stop
    }

    /// Shows a modal message, like a browser `alert`.
    pub fn notify(&self, notification: &Notification) {
        let message_type = match notification.level {
            NotificationLevel::Info => MessageType::Info,
            NotificationLevel::Error => {
                warn!(message = %notification.message, "showing error");
                MessageType::Error
            }
        };

        let dialog = MessageDialog::new(
            Some(&self.window),
            DialogFlags::MODAL | DialogFlags::DESTROY_WITH_PARENT,
            message_type,
            ButtonsType::Ok,
            &notification.message,
        );
        dialog.connect_response(|dialog, _| dialog.close());
        dialog.show();
    }
}

fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_data(CSS.as_bytes());

    match gdk::Display::default() {
        Some(display) => gtk::StyleContext::add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => warn!("no display to attach styles to"),
    }
}

/// Runs the GTK application until the window closes. Returns the exit status.
pub fn run(config: Config, api: Arc<dyn AttendanceApi>) -> i32 {
    let application = Application::new(Some(APP_ID), Default::default());
    let config = Rc::new(config);

    application.connect_activate(move |app| {
        load_css();

        let window = ApplicationWindow::builder()
            .application(app)
            .title("Attendance Scanner")
            .default_width(480)
            .default_height(720)
            .build();

        let navigator = Navigator::new(window.clone(), Rc::clone(&config), Arc::clone(&api));
        navigator.show(Screen::Login);
        window.present();
    });

    application.run()
}
