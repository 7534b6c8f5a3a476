//! Static route table: path → view → `requires_auth`.

use crate::error::RouteError;

use common::ErrorLocation;

use std::collections::HashMap;

use log::warn;
use once_cell::sync::Lazy;

/// Name of the route the guard redirects to.
pub const LOGIN_ROUTE_NAME: &str = "login";

/// View a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    TicketSearch,
    UserInfo,
    Passenger,
    MyTicket,
    Order,
    AddPassenger,
    CheckOrder,
    BuyTicket,
    AliPay,
    TicketList,
    PersonalTicket,
    PaySuccess,
    AdminTrainList,
    AdminUser,
    AdminOrderSearch,
    AdminFinance,
}

/// One registered route. Immutable once in a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub label: Option<&'static str>,
    /// `None` for pure redirect entries.
    pub view: Option<View>,
    pub requires_auth: bool,
    pub redirect: Option<&'static str>,
}

impl RouteDescriptor {
    pub const fn page(
        path: &'static str,
        name: &'static str,
        label: &'static str,
        view: View,
        requires_auth: bool,
    ) -> Self {
        Self {
            path,
            name,
            label: Some(label),
            view: Some(view),
            requires_auth,
            redirect: None,
        }
    }

    pub const fn redirect(path: &'static str, name: &'static str, to: &'static str) -> Self {
        Self {
            path,
            name,
            label: None,
            view: None,
            requires_auth: false,
            redirect: Some(to),
        }
    }

    pub fn is_login(&self) -> bool {
        self.name == LOGIN_ROUTE_NAME
    }
}

/// Routes of the booking console.
#[rustfmt::skip]
pub const CONSOLE_ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor::redirect("/", "index", "/ticketSearch"),
    RouteDescriptor {
        path: "/login",
        name: LOGIN_ROUTE_NAME,
        label: None,
        view: Some(View::Login),
        requires_auth: false,
        redirect: None,
    },
    RouteDescriptor::page("/ticketSearch", "ticketSearch", "Ticket search", View::TicketSearch, false),
    RouteDescriptor::page("/userInfo", "userInfo", "User info", View::UserInfo, true),
    RouteDescriptor::page("/passenger", "passenger", "Passengers", View::Passenger, true),
    RouteDescriptor::page("/myTicket", "myTicket", "My tickets", View::MyTicket, true),
    RouteDescriptor::page("/order", "order", "My orders", View::Order, true),
    RouteDescriptor::page("/addPassenger", "addPassenger", "Add passenger", View::AddPassenger, true),
    RouteDescriptor::page("/checkOrder", "checkOrder", "Checkout", View::CheckOrder, true),
    RouteDescriptor::page("/buyTicket", "buyTicket", "Buy ticket", View::BuyTicket, true),
    RouteDescriptor::page("/aliPay", "aliPay", "Alipay", View::AliPay, true),
    RouteDescriptor::page("/ticketList", "ticketList", "Order list", View::TicketList, true),
    RouteDescriptor::page("/personalTicket", "personalTicket", "Personal tickets", View::PersonalTicket, false),
    RouteDescriptor::page("/paySuccess", "paySuccess", "Payment complete", View::PaySuccess, false),
    RouteDescriptor::page("/adminTrainList", "adminTrainList", "Train search", View::AdminTrainList, false),
    RouteDescriptor::page("/adminUser", "adminUser", "User management", View::AdminUser, false),
    RouteDescriptor::page("/adminOrderSerach", "adminOrderSerach", "Order management", View::AdminOrderSearch, false),
    RouteDescriptor::page("/adminFinance", "adminFinance", "Finance", View::AdminFinance, false),
];

/// Process-wide console route table.
pub static ROUTE_TABLE: Lazy<RouteTable> = Lazy::new(RouteTable::console);

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    by_path: HashMap<String, usize>,
    by_name: HashMap<&'static str, usize>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with [`CONSOLE_ROUTES`] registered.
    pub fn console() -> Self {
        let mut table = Self::new();
        for descriptor in CONSOLE_ROUTES {
            if let Err(e) = table.register(descriptor.clone()) {
                warn!("Skipping console route: {e}");
            }
        }
        table
    }

    #[track_caller]
    pub fn register(&mut self, descriptor: RouteDescriptor) -> Result<(), RouteError> {
        if !descriptor.path.starts_with('/') {
            return Err(RouteError::InvalidPath {
                path: descriptor.path.to_string(),
                location: ErrorLocation::caller(),
            });
        }

        let key = normalize_path(descriptor.path);
        if self.by_path.contains_key(&key) {
            return Err(RouteError::DuplicatePath {
                path: descriptor.path.to_string(),
                location: ErrorLocation::caller(),
            });
        }
        if self.by_name.contains_key(descriptor.name) {
            return Err(RouteError::DuplicateName {
                name: descriptor.name.to_string(),
                location: ErrorLocation::caller(),
            });
        }

        let index = self.routes.len();
        self.by_path.insert(key, index);
        self.by_name.insert(descriptor.name, index);
        self.routes.push(descriptor);
        Ok(())
    }

    /// Exact lookup. Case, trailing slash, query string and fragment are ignored.
    pub fn by_path(&self, path: &str) -> Option<&RouteDescriptor> {
        self.by_path
            .get(&normalize_path(path))
            .map(|&index| &self.routes[index])
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteDescriptor> {
        self.by_name.get(name).map(|&index| &self.routes[index])
    }

    pub fn login_route(&self) -> Option<&RouteDescriptor> {
        self.by_name(LOGIN_ROUTE_NAME)
    }

    /// Look up `path`, following a redirect entry once.
    pub fn resolve(&self, path: &str) -> Option<&RouteDescriptor> {
        let route = self.by_path(path)?;
        match route.redirect {
            Some(target) => self.by_path(target),
            None => Some(route),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
    trimmed.to_ascii_lowercase()
}
