use utoipa::OpenApi;
use crate::controllers::report_controller;
use crate::models::{energy, orientation, series};
use crate::config;

#[derive(OpenApi)]
#[openapi(
    paths(
        report_controller::list_plants,
        report_controller::get_plant_orientation,
        report_controller::post_plant_report,
        report_controller::post_report,
        report_controller::list_directions
    ),
    components(
        schemas(
            config::PlantConfig,
            energy::SystemConfig,
            energy::AggregateReport,
            energy::PeriodSummary,
            orientation::Direction,
            orientation::DirectionEntry,
            orientation::OrientationResponse,
            series::SeriesPayload,
            series::ReportRequest,
            report_controller::ErrorResponse
        )
    ),
    tags(
        (name = "solar-yield-report", description = "PV energy-yield aggregation API")
    )
)]
pub struct ApiDoc;
