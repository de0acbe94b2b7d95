use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/projects", project_routes())
        .nest("/assets", asset_routes())
        .nest("/images", image_routes())
        .nest("/videos", video_routes())
        .nest("/try-on", tryon_routes())
        .nest("/context", context_routes())
}

fn project_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::projects::create_project,
            handlers::projects::list_projects
        ))
        .routes(routes!(
            handlers::projects::get_project,
            handlers::projects::update_project,
            handlers::projects::delete_project
        ))
        .routes(routes!(handlers::projects::list_project_assets))
}

fn asset_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::assets::get_asset,
        handlers::assets::delete_asset
    ))
}

fn image_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::images::generate_images))
        .routes(routes!(handlers::images::edit_image))
        .routes(routes!(handlers::images::save_image))
        .routes(routes!(handlers::images::optimize_prompt))
        .layer(handlers::images::upload_body_limit())
}

fn video_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::videos::generate_videos))
        .routes(routes!(handlers::videos::image_to_video))
        .routes(routes!(handlers::videos::first_last_video))
        .routes(routes!(handlers::videos::reference_video))
        .routes(routes!(handlers::videos::extend_video))
        .routes(routes!(handlers::videos::optimize_motion_prompt))
        .routes(routes!(handlers::videos::generate_script))
        .routes(routes!(handlers::videos::edit_script))
        .routes(routes!(handlers::videos::save_video))
        .layer(handlers::videos::upload_body_limit())
}

fn tryon_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::tryon::virtual_try_on))
        .routes(routes!(handlers::tryon::save_try_on))
        .layer(handlers::tryon::upload_body_limit())
}

fn context_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::context::generate_context))
        .routes(routes!(handlers::context::enhance_field))
        .routes(routes!(handlers::context::analyze_brand))
        .routes(routes!(handlers::context::analyze_file))
        .routes(routes!(handlers::context::synthesize_context))
        .routes(routes!(handlers::context::prompt_insight))
        .routes(routes!(handlers::context::create_version))
        .routes(routes!(
            handlers::context::list_versions,
            handlers::context::update_version,
            handlers::context::delete_version
        ))
        .routes(routes!(handlers::context::get_version))
        .layer(handlers::context::upload_body_limit())
}
