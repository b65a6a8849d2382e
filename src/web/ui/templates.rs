use askama::Template;
use askama_web::WebTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub stops_json: String,
    pub center_lat: f64,
    pub center_lon: f64,
}
