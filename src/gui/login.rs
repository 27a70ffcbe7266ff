use gtk::prelude::*;
use gtk::{Box, Button, Entry, Label, PasswordEntry};

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

use tracing::debug;

use crate::{
    gui::Navigator,
    screens::{LoginError, LoginScreen, Notification, Screen},
};

pub fn login_widget(navigator: Navigator) -> Box {
    let list_box = Box::builder()
        .orientation(gtk::Orientation::Vertical)
        .spacing(10)
        .margin_top(20)
        .margin_start(20)
        .margin_end(20)
        .build();

    let login_title = Label::builder()
        .label("<b><big>Login</big></b>")
        .use_markup(true)
        .build();

    let username = Entry::builder().placeholder_text("Username").build();
    let password = PasswordEntry::builder()
        .placeholder_text("Password")
        .show_peek_icon(true)
        .build();

    let sign_in_button = Button::builder()
        .label("Sign In")
        .css_classes(vec!["primary".to_string()])
        .build();
    let register_button = Button::builder().label("Create an account").build();

    list_box.append(&login_title);
    list_box.append(&username);
    list_box.append(&password);
    list_box.append(&sign_in_button);
    list_box.append(&register_button);

    let login = Rc::new(RefCell::new(LoginScreen::new()));

    let sign_in_navigator = navigator.clone();
    sign_in_button.connect_clicked(move |button| {
        let credentials = match login
            .borrow_mut()
            .begin(&username.text(), &password.text())
        {
            Ok(credentials) => credentials,
            Err(LoginError::Pending) => return,
            Err(e @ LoginError::MissingFields) => {
                sign_in_navigator.notify(&Notification::error(e.to_string()));
                return;
            }
        };
        button.set_sensitive(false);

        // The request blocks, so it runs on its own thread and reports back
        // through the main loop.
        let (sender, receiver) = glib::MainContext::channel(glib::PRIORITY_DEFAULT);
        let api = sign_in_navigator.api();
        thread::spawn(move || {
            let result = api.login(&credentials);
            if sender.send(result).is_err() {
                debug!("login screen closed before the backend answered");
            }
        });

        let login = Rc::clone(&login);
        let navigator = sign_in_navigator.clone();
        let button = button.clone();
        let password = password.clone();
        receiver.attach(None, move |result| {
            let outcome = login.borrow_mut().complete(result);
            button.set_sensitive(true);
            navigator.notify(&outcome.notification);
            match outcome.navigate_to {
                Some(screen) => navigator.show(screen),
                None => password.set_text(""),
            }
            glib::Continue(false)
        });
    });

    register_button.connect_clicked(move |_| navigator.show(Screen::Register));

    list_box
}
