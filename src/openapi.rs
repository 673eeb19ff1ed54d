use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::home,
        api::health,
        api::analyze_image,
        api::generate_slogan,
        api::generate_poster,
    ),
    components(
        schemas(
            api::SloganRequest,
            api::PosterRequest,
            api::SloganResponse,
            api::PosterResponse,
            api::AnalyzeResponse,
        )
    ),
    tags(
        (name = "postergen", description = "Poster generation backend API")
    )
)]
pub struct ApiDoc;
