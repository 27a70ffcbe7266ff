use gtk::prelude::*;
use gtk::{Box, Button, Entry, Label, PasswordEntry};

use std::rc::Rc;

use crate::{
    gui::Navigator,
    screens::{RegisterForm, RegisterScreen},
};

pub fn register_widget(navigator: Navigator) -> Box {
    let list_box = Box::builder()
        .orientation(gtk::Orientation::Vertical)
        .spacing(10)
        .margin_top(20)
        .margin_start(20)
        .margin_end(20)
        .build();

    let register_title = Label::builder()
        .label("<b><big>Register</big></b>")
        .use_markup(true)
        .build();

    let full_name = Entry::builder().placeholder_text("Full Name").build();
    let username = Entry::builder().placeholder_text("Username").build();
    let password = PasswordEntry::builder()
        .placeholder_text("Password")
        .show_peek_icon(true)
        .build();

    let register_button = Button::builder()
        .label("Register")
        .css_classes(vec!["primary".to_string()])
        .build();
    let login_button = Button::builder()
        .label("Go to Login")
        .css_classes(vec!["register".to_string()])
        .build();

    list_box.append(&register_title);
    list_box.append(&full_name);
    list_box.append(&username);
    list_box.append(&password);
    list_box.append(&register_button);
    list_box.append(&login_button);

    let register = Rc::new(RegisterScreen::new());

    let register_navigator = navigator.clone();
    let register_screen = Rc::clone(&register);
    register_button.connect_clicked(move |_| {
        let form = RegisterForm {
            full_name: full_name.text().to_string(),
            username: username.text().to_string(),
            password: password.text().to_string(),
        };
        register_navigator.show(register_screen.submit(form));
    });

    login_button.connect_clicked(move |_| navigator.show(register.go_to_login()));

    list_box
}
