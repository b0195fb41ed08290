//! Component registry
//!
//! Every view is registered in a [`Container`] under a stable key with the
//! keys of the components it composes, then decorated with its store
//! connection. Resolving [`APP`] builds the whole tree.

use std::sync::Arc;

use shlink_app::container::Container;
use shlink_core::prelude::*;
use shlink_core::ColorGenerator;

use crate::component::{colors, component, connected, Component, Service, View};
use crate::widgets::{
    App, AppParts, AppUpdateBanner, CreateShortUrlForm, Home, MainHeader, ManageServers,
    NotFound, ServerForm, ServerView, ServersDropdown, SettingsView, ShortUrlsTable,
    TagsListView, TagsSelector, VersionsFooter,
};

pub const APP: &str = "App";
pub const COLORS: &str = "ColorGenerator";

const HEADER: &str = "MainHeader";
const BANNER: &str = "AppUpdateBanner";
const FOOTER: &str = "VersionsFooter";
const DROPDOWN: &str = "ServersDropdown";
const HOME: &str = "Home";
const MANAGE_SERVERS: &str = "ManageServers";
const SERVER_FORM: &str = "ServerForm";
const SETTINGS: &str = "Settings";
const SERVER: &str = "ServerView";
const NOT_FOUND: &str = "NotFound";
const SHORT_URLS: &str = "ShortUrlsTable";
const CREATE_SHORT_URL: &str = "CreateShortUrl";
const TAGS_SELECTOR: &str = "TagsSelector";
const TAGS_LIST: &str = "TagsListView";

fn view(view: impl View + 'static) -> Result<Arc<Service>> {
    Ok(Arc::new(Service::View(Arc::new(view))))
}

/// Register every component of the console
pub fn provide_components(c: &mut Container<Service>) {
    c.register(COLORS, &[], |_| {
        Ok(Arc::new(Service::Colors(Arc::new(ColorGenerator::new()))))
    });

    c.register(HEADER, &[], |_| view(MainHeader));
    c.decorate(HEADER, connected(MainHeader::connection()));
    c.register(BANNER, &[], |_| view(AppUpdateBanner));
    c.decorate(BANNER, connected(AppUpdateBanner::connection()));
    c.register(FOOTER, &[], |_| view(VersionsFooter));
    c.decorate(FOOTER, connected(VersionsFooter::connection()));
    c.register(DROPDOWN, &[], |_| view(ServersDropdown));
    c.decorate(DROPDOWN, connected(ServersDropdown::connection()));

    c.register(HOME, &[], |_| view(Home));
    c.decorate(HOME, connected(Home::connection()));
    c.register(MANAGE_SERVERS, &[], |_| view(ManageServers));
    c.decorate(MANAGE_SERVERS, connected(ManageServers::connection()));
    c.register(SERVER_FORM, &[], |_| view(ServerForm));
    c.decorate(SERVER_FORM, connected(ServerForm::connection()));
    c.register(SETTINGS, &[], |_| view(SettingsView));
    c.decorate(SETTINGS, connected(SettingsView::connection()));
    c.register(NOT_FOUND, &[], |_| view(NotFound));
    c.decorate(NOT_FOUND, connected(NotFound::connection()));

    c.register(SHORT_URLS, &[COLORS], |r| {
        view(ShortUrlsTable::new(colors(r, COLORS)?))
    });
    c.decorate(SHORT_URLS, connected(ShortUrlsTable::connection()));
    c.register(CREATE_SHORT_URL, &[COLORS], |r| {
        view(CreateShortUrlForm::new(colors(r, COLORS)?))
    });
    c.decorate(CREATE_SHORT_URL, connected(CreateShortUrlForm::connection()));
    c.register(TAGS_SELECTOR, &[COLORS], |r| {
        view(TagsSelector::new(colors(r, COLORS)?))
    });
    c.decorate(TAGS_SELECTOR, connected(TagsSelector::connection()));
    c.register(TAGS_LIST, &[COLORS], |r| {
        view(TagsListView::new(colors(r, COLORS)?))
    });
    c.decorate(TAGS_LIST, connected(TagsListView::connection()));

    c.register(
        SERVER,
        &[SHORT_URLS, CREATE_SHORT_URL, TAGS_SELECTOR, TAGS_LIST],
        |r| {
            view(ServerView::new(
                component(r, SHORT_URLS)?,
                component(r, CREATE_SHORT_URL)?,
                component(r, TAGS_SELECTOR)?,
                component(r, TAGS_LIST)?,
            ))
        },
    );
    c.decorate(SERVER, connected(ServerView::connection()));

    c.register(
        APP,
        &[
            HEADER,
            BANNER,
            FOOTER,
            DROPDOWN,
            HOME,
            MANAGE_SERVERS,
            SERVER_FORM,
            SETTINGS,
            SERVER,
            NOT_FOUND,
        ],
        |r| {
            view(App::new(AppParts {
                header: component(r, HEADER)?,
                banner: component(r, BANNER)?,
                footer: component(r, FOOTER)?,
                dropdown: component(r, DROPDOWN)?,
                home: component(r, HOME)?,
                manage_servers: component(r, MANAGE_SERVERS)?,
                server_form: component(r, SERVER_FORM)?,
                settings: component(r, SETTINGS)?,
                server: component(r, SERVER)?,
                not_found: component(r, NOT_FOUND)?,
            }))
        },
    );
    c.decorate(APP, connected(App::connection()));
}

/// Root component of a container filled by [`provide_components`]
pub fn resolve_app(c: &Container<Service>) -> Result<Arc<dyn Component>> {
    match c.resolve(APP)?.as_ref() {
        Service::Component(app) => Ok(app.clone()),
        _ => Err(Error::WrongKind {
            key: APP.to_string(),
            expected: "connected component",
        }),
    }
}
