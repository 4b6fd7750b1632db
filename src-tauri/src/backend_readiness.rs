use std::{
    net::{TcpStream, ToSocketAddrs},
    thread,
    time::{Duration, Instant},
};

use crate::{
    backend_config::{self, ReadinessPolicy, ReadinessProbe},
    backend_supervisor::ProcessStatus,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ReadinessError {
    #[error("backend URL {0} has no reachable host/port")]
    InvalidBackendUrl(String),
    #[error("backend process exited before becoming reachable: {0}")]
    BackendExited(String),
    #[error("timed out after {waited_ms}ms waiting for backend at {backend_url}")]
    TimedOut { backend_url: String, waited_ms: u128 },
}

pub(crate) fn ping_backend(backend_url: &str, probe: &ReadinessProbe, timeout: Duration) -> bool {
    match probe {
        ReadinessProbe::Tcp => tcp_probe(backend_url, timeout),
        ReadinessProbe::Http { path } => http_probe(backend_url, path, timeout),
    }
}

fn tcp_probe(backend_url: &str, timeout: Duration) -> bool {
    let Some((host, port)) = backend_config::backend_host_port(backend_url) else {
        return false;
    };
    let timeout = timeout.max(Duration::from_millis(50));
    let addrs = match (host.as_str(), port).to_socket_addrs() {
        Ok(addrs) => addrs.collect::<Vec<_>>(),
        Err(_) => return false,
    };
    addrs
        .iter()
        .any(|address| TcpStream::connect_timeout(address, timeout).is_ok())
}

fn http_probe(backend_url: &str, path: &str, timeout: Duration) -> bool {
    let url = format!("{}{}", backend_url.trim_end_matches('/'), path);
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    match agent.get(&url).call() {
        Ok(response) => (200..300).contains(&response.status()),
        Err(_) => false,
    }
}

/// Polls until the backend answers. `process_status` is consulted between probes so a
/// crashed child fails the wait early instead of running out the timeout.
pub(crate) fn wait_for_backend<S>(
    backend_url: &str,
    policy: &ReadinessPolicy,
    process_status: S,
) -> Result<Duration, ReadinessError>
where
    S: Fn() -> ProcessStatus,
{
    if backend_config::backend_host_port(backend_url).is_none() {
        return Err(ReadinessError::InvalidBackendUrl(backend_url.to_string()));
    }

    let started = Instant::now();
    loop {
        if ping_backend(backend_url, &policy.probe, policy.probe_timeout) {
            return Ok(started.elapsed());
        }

        if let ProcessStatus::Exited(description) = process_status() {
            return Err(ReadinessError::BackendExited(description));
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.timeout {
            return Err(ReadinessError::TimedOut {
                backend_url: backend_url.to_string(),
                waited_ms: elapsed.as_millis(),
            });
        }

        thread::sleep(policy.poll_interval.min(policy.timeout - elapsed));
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
    };

    use super::*;

    fn fast_policy(probe: ReadinessProbe) -> ReadinessPolicy {
        ReadinessPolicy {
            timeout: Duration::from_millis(300),
            poll_interval: Duration::from_millis(50),
            probe_timeout: Duration::from_millis(100),
            probe,
        }
    }

    fn unused_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe port");
        listener.local_addr().expect("local addr").port()
    }

    #[test]
    fn wait_for_backend_succeeds_once_port_accepts_connections() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let url = format!("http://127.0.0.1:{}/", listener.local_addr().unwrap().port());

        let result = wait_for_backend(&url, &fast_policy(ReadinessProbe::Tcp), || {
            ProcessStatus::Running { pid: 1 }
        });
        assert!(result.is_ok());
    }

    #[test]
    fn wait_for_backend_times_out_when_nothing_listens() {
        let url = format!("http://127.0.0.1:{}/", unused_port());

        let error = wait_for_backend(&url, &fast_policy(ReadinessProbe::Tcp), || {
            ProcessStatus::Running { pid: 1 }
        })
        .expect_err("nothing is listening");
        assert!(matches!(error, ReadinessError::TimedOut { .. }));
    }

    #[test]
    fn wait_for_backend_fails_fast_when_process_exits() {
        let url = format!("http://127.0.0.1:{}/", unused_port());

        let error = wait_for_backend(&url, &fast_policy(ReadinessProbe::Tcp), || {
            ProcessStatus::Exited("exit code 1".to_string())
        })
        .expect_err("process exited");
        assert_eq!(
            error,
            ReadinessError::BackendExited("exit code 1".to_string())
        );
    }

    #[test]
    fn wait_for_backend_rejects_url_without_host() {
        let error = wait_for_backend("not-a-url", &fast_policy(ReadinessProbe::Tcp), || {
            ProcessStatus::NotStarted
        })
        .expect_err("invalid url");
        assert!(matches!(error, ReadinessError::InvalidBackendUrl(_)));
    }

    #[test]
    fn http_probe_accepts_success_status() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let url = format!("http://127.0.0.1:{}/", listener.local_addr().unwrap().port());
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept probe");
            let mut buffer = [0_u8; 1024];
            let _ = stream.read(&mut buffer);
            let _ = stream.write_all(
                b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
            );
        });

        assert!(ping_backend(
            &url,
            &ReadinessProbe::Http {
                path: "/health".to_string()
            },
            Duration::from_secs(2),
        ));
        server.join().expect("server thread");
    }
}
