// Application state for HTTP handlers
use crate::application::auth_service::AuthService;
use crate::application::dashboard_service::DashboardService;
use crate::application::latest_reading_poller::LatestReadingPoller;
use crate::application::transmitter_service::TransmitterService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub transmitter_service: TransmitterService,
    pub dashboard_service: DashboardService,
    pub poller: LatestReadingPoller,
}
