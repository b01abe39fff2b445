//! Backend origin for the reporting endpoints

/// Origin of the reporting backend, same host as the page.
///
/// Returns e.g. "http://localhost:8080", or an empty string when there is no
/// window (host-side tests), which leaves request URLs relative.
pub fn api_base(port: u16) -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    origin(&protocol, &hostname, port)
}

fn origin(protocol: &str, hostname: &str, port: u16) -> String {
    format!("{}//{}:{}", protocol, hostname, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        assert_eq!(origin("https:", "plant.local", 8080), "https://plant.local:8080");
    }
}
