use crate::config::WindowConfig;
use crate::gui::app::AppMsg;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;

pub fn init_window(window: &gtk::ApplicationWindow, config: &WindowConfig) {
    window.set_title(Some(&config.title));
    window.set_default_size(config.width, config.height);
}

pub fn key_message(key: gdk::Key) -> Option<AppMsg> {
    match key {
        gdk::Key::Left | gdk::Key::KP_Left => Some(AppMsg::Previous),
        gdk::Key::Right | gdk::Key::KP_Right => Some(AppMsg::Next),
        gdk::Key::Home | gdk::Key::KP_Home => Some(AppMsg::First),
        gdk::Key::End | gdk::Key::KP_End => Some(AppMsg::Last),
        gdk::Key::Return | gdk::Key::KP_Enter => Some(AppMsg::Activate),
        _ => None,
    }
}
