//! Failure-injection tests: retry recovery and abort-on-failure cleanup.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use http::HeaderMap;

    use crate::stub::{Faults, spawn_stub};
    use crate::{patterned, test_key, uploader_for};

    #[tokio::test]
    async fn test_should_recover_when_a_part_fails_once() {
        let faults = Faults {
            part: HashMap::from([(2, 1)]),
            ..Faults::default()
        };
        let (addr, state) = spawn_stub(faults).await;
        let uploader = uploader_for(addr, 3);
        let key = test_key("flaky");

        let payload = patterned(12 * 1024 * 1024);
        uploader
            .upload(payload.clone(), &key, HeaderMap::new())
            .await
            .expect("upload");

        assert_eq!(state.object(&key).expect("stored"), payload);

        let counters = state.counters();
        assert_eq!(counters.part, 4, "three parts plus one retried attempt");
        assert_eq!(counters.abort, 0);
    }

    #[tokio::test]
    async fn test_should_abort_after_persistent_part_failures() {
        let faults = Faults {
            part: HashMap::from([(2, u32::MAX)]),
            ..Faults::default()
        };
        let (addr, state) = spawn_stub(faults).await;
        let uploader = uploader_for(addr, 1);
        let key = test_key("persistent");

        let err = uploader
            .upload(patterned(12 * 1024 * 1024), &key, HeaderMap::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("injected part failure"));
        assert_eq!(state.counters().abort, 1, "exactly one cleanup call");
        assert_eq!(state.open_sessions(), 0, "session removed by the abort");
        assert!(state.object(&key).is_none(), "nothing was stored");
    }

    #[tokio::test]
    async fn test_should_abort_when_completion_fails() {
        let faults = Faults {
            complete: u32::MAX,
            ..Faults::default()
        };
        let (addr, state) = spawn_stub(faults).await;
        let uploader = uploader_for(addr, 1);
        let key = test_key("stuck");

        let err = uploader
            .upload(patterned(6 * 1024 * 1024), &key, HeaderMap::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("injected completion failure"));
        assert_eq!(state.counters().abort, 1);
        assert_eq!(state.open_sessions(), 0);
        assert!(state.object(&key).is_none());
    }
}
