mod visitor_service;

pub use visitor_service::VisitorService;
