use crate::{
    api::{ApiError, AttendanceEvent},
    config::ScannerConfig,
    gui::Navigator,
    scanner::{self, PayloadBuffer, PermissionState, ScannerAccess},
    screens::{HomeScreen, HomeView},
};
use gtk::prelude::*;
use gtk::{Box, Button, EventControllerKey, Label, Orientation};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

/// Everything that reaches the Home screen from outside the main loop.
enum HomeMessage {
    Permission(PermissionState),
    Payload(String),
    Recorded(Result<(), ApiError>),
}

#[derive(Clone)]
struct HomeWidgets {
    status: Label,
    card: Label,
    scan_again: Button,
    entry: Button,
    exit: Button,
    history: Label,
}

impl HomeWidgets {
    fn render(&self, view: &HomeView) {
        self.status.set_text(&view.status);

        let card_markup = view
            .identity_lines
            .iter()
            .map(|line| match line.split_once(": ") {
                Some((label, value)) => {
                    format!("{}: <b>{}</b>", label, glib::markup_escape_text(value))
                }
                None => glib::markup_escape_text(line).to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.card.set_markup(&card_markup);
        self.card.set_visible(!view.identity_lines.is_empty());

        self.scan_again.set_visible(view.show_scan_again);
        self.entry.set_sensitive(view.actions_enabled);
        self.exit.set_sensitive(view.actions_enabled);

        self.history.set_text(&view.history.join("\n"));
    }
}

// Opens the scanner off the main loop, then keeps feeding serial payloads
// until `stop` is raised or the screen's receiver is gone.
fn request_scanner_access(
    scanner_config: ScannerConfig,
    stop: Arc<AtomicBool>,
    sender: glib::Sender<HomeMessage>,
) {
    thread::spawn(move || {
        let access = scanner::request_access(&scanner_config);
        let permission = PermissionState::from(&access);
        if sender.send(HomeMessage::Permission(permission)).is_err() {
            return;
        }

        if let Ok(ScannerAccess::Serial(serial)) = access {
            let result = serial.run(&stop, |payload| {
                sender.send(HomeMessage::Payload(payload)).is_ok()
            });
            if let Err(e) = result {
                error!("serial scanner stopped: {}", e);
            }
        }
    });
}

pub fn home_widget(navigator: Navigator) -> Box {
    let list_box = Box::builder()
        .orientation(gtk::Orientation::Vertical)
        .spacing(10)
        .margin_top(20)
        .margin_start(20)
        .margin_end(20)
        .build();

    let home_title = Label::builder()
        .label("<b><big>Attendance</big></b>")
        .use_markup(true)
        .build();

    let widgets = HomeWidgets {
        status: Label::new(None),
        card: Label::builder()
            .css_classes(vec!["card".to_string()])
            .visible(false)
            .build(),
        scan_again: Button::builder()
            .label("Scan Again")
            .focus_on_click(false)
            .css_classes(vec!["scan-again".to_string()])
            .visible(false)
            .build(),
        entry: Button::builder()
            .label("Entry")
            .focus_on_click(false)
            .css_classes(vec!["entry".to_string()])
            .build(),
        exit: Button::builder()
            .label("Exit")
            .focus_on_click(false)
            .css_classes(vec!["exit".to_string()])
            .build(),
        history: Label::new(None),
    };

    let buttons = Box::new(Orientation::Horizontal, 20);
    buttons.set_halign(gtk::Align::Center);
    buttons.append(&widgets.entry);
    buttons.append(&widgets.exit);

    list_box.append(&home_title);
    list_box.append(&widgets.status);
    list_box.append(&widgets.card);
    list_box.append(&widgets.scan_again);
    list_box.append(&buttons);
    list_box.append(&widgets.history);

    let home = Rc::new(RefCell::new(HomeScreen::new()));
    widgets.render(&home.borrow().view());

    let (sender, receiver) = glib::MainContext::channel(glib::PRIORITY_DEFAULT);

    let receiver_home = Rc::clone(&home);
    let receiver_widgets = widgets.clone();
    let receiver_navigator = navigator.clone();
    let source = receiver.attach(None, move |message| {
        let notification = {
            let mut home = receiver_home.borrow_mut();
            match message {
                HomeMessage::Permission(permission) => {
                    home.permission_resolved(permission);
                    None
                }
                HomeMessage::Payload(payload) => home.scan(&payload),
                HomeMessage::Recorded(result) => home.complete(result),
            }
        };
        receiver_widgets.render(&receiver_home.borrow().view());
        if let Some(notification) = notification {
            receiver_navigator.notify(&notification);
        }
        glib::Continue(true)
    });
    navigator.own_source(source);

    request_scanner_access(
        navigator.config().scanner.clone(),
        navigator.stop_on_unmount(),
        sender.clone(),
    );

    if navigator.config().scanner == ScannerConfig::Keyboard {
        // A keyboard-wedge scanner types the barcode into whichever window has
        // focus, finishing with a carriage return. The window sees the keys in
        // the capture phase so a focused button never gets the space or Return
        // out of a payload.
        let key_controller = EventControllerKey::new();
        key_controller.set_propagation_phase(gtk::PropagationPhase::Capture);
        let key_sender = sender.clone();
        let buffer = RefCell::new(PayloadBuffer::new());
        key_controller.connect_key_pressed(move |_, key, _, _| {
            let unicode_value = match key.to_unicode() {
                Some(c) if scanner::is_scanner_key(c) => c,
                _ => return gtk::Inhibit(false),
            };
            if let Some(payload) = buffer.borrow_mut().push_char(unicode_value) {
                if key_sender.send(HomeMessage::Payload(payload)).is_err() {
                    debug!("home screen gone, payload dropped");
                }
            }
            gtk::Inhibit(true)
        });
        navigator.add_key_controller(key_controller);
    }

    for (button, event) in [
        (widgets.entry.clone(), AttendanceEvent::Entry),
        (widgets.exit.clone(), AttendanceEvent::Exit),
    ] {
        let home = Rc::clone(&home);
        let widgets = widgets.clone();
        let sender = sender.clone();
        let api = navigator.api();
        button.connect_clicked(move |_| {
            let request = match home.borrow_mut().begin(event) {
                Ok(request) => request,
                Err(e) => {
                    debug!("{} ignored: {}", event, e);
                    return;
                }
            };
            widgets.render(&home.borrow().view());

            let api = api.clone();
            let sender = sender.clone();
            thread::spawn(move || {
                let result = api.record(&request);
                if sender.send(HomeMessage::Recorded(result)).is_err() {
                    debug!("home screen gone, attendance result dropped");
                }
            });
        });
    }

    let scan_again_home = Rc::clone(&home);
    let scan_again = widgets.scan_again.clone();
    scan_again.connect_clicked(move |_| {
        scan_again_home.borrow_mut().scan_again();
        widgets.render(&scan_again_home.borrow().view());
    });

    list_box
}
