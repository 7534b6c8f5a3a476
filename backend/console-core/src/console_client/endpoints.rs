//! Backend paths, relative to the configured base URL.

// user-service
pub const LOGIN: &str = "/api/user-service/v1/login";
pub const REGISTER: &str = "/api/user-service/register";
pub const LOGOUT: &str = "/api/user-service/logout";
pub const CHECK_LOGIN: &str = "/api/user-service/check-login";
pub const USER_INFO: &str = "/api/user-service/query";
pub const USER_UPDATE: &str = "/api/user-service/update";
pub const USER_INFO_LIST: &str = "/api/user-service/queryList";
pub const PASSENGER_LIST: &str = "/api/user-service/passenger/query";
pub const DELETE_PASSENGER: &str = "/api/user-service/passenger/remove";
pub const ADD_PASSENGER: &str = "/api/user-service/passenger/save";
pub const EDIT_PASSENGER: &str = "/api/user-service/passenger/update";

// ticket-service
pub const TICKET_SEARCH: &str = "/api/ticket-service/ticket/query";
pub const REGION_STATION: &str = "/api/ticket-service/region-station/query";
pub const BUY_TICKET: &str = "/api/ticket-service/ticket/purchase/v2";
pub const STATION_ALL: &str = "/api/ticket-service/station/all";
pub const TRAIN_STATION: &str = "/api/ticket-service/train-station/query";
pub const ORDER_CANCEL: &str = "/api/ticket-service/ticket/cancel";
pub const REFUND_TICKET: &str = "/api/ticket-service/ticket/refund";

// order-service
pub const ORDER_BY_SN: &str = "/api/order-service/order/ticket/query";
pub const TICKET_LIST: &str = "/api/order-service/order/ticket/page";
pub const MY_TICKET: &str = "/api/order-service/order/ticket/self/page";
pub const ORDER_INFO_LIST: &str = "/api/order-service/order/ticket/queryList";

// pay-service
pub const PAY: &str = "/api/pay-service/pay/create";
pub const ORDER_STATUS: &str = "/api/pay-service/pay/query/order-sn";

// admin
pub const ADMIN_LOGIN: &str = "/admin/admin-service/login";
