pub mod report_routes;
