use std::net::IpAddr;

use relay_viewer_data_management::DataManager;

pub struct ServerState {
    pub data_manager: DataManager,
    /// Address the dashboard is reachable at from the local network, if known.
    pub ip_address: Option<IpAddr>,
}
