//! End-to-end upload tests against the stub backend.

#[cfg(test)]
mod tests {
    use http::{HeaderMap, StatusCode};

    use crate::stub::{Faults, spawn_stub};
    use crate::{patterned, test_key, uploader_for};

    #[tokio::test]
    async fn test_should_upload_a_small_object_with_a_single_put() {
        let (addr, state) = spawn_stub(Faults::default()).await;
        let uploader = uploader_for(addr, 0);
        let key = test_key("small");

        let payload = patterned(64 * 1024);
        let response = uploader
            .upload(payload.clone(), &key, HeaderMap::new())
            .await
            .expect("upload");

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(state.object(&key).expect("stored"), payload);

        let counters = state.counters();
        assert_eq!(counters.single_put, 1);
        assert_eq!(counters.initiate, 0);
    }

    #[tokio::test]
    async fn test_should_upload_an_empty_object() {
        let (addr, state) = spawn_stub(Faults::default()).await;
        let uploader = uploader_for(addr, 0);
        let key = test_key("empty");

        uploader
            .upload(bytes::Bytes::new(), &key, HeaderMap::new())
            .await
            .expect("upload");

        let stored = state.object(&key).expect("stored");
        assert!(stored.is_empty());
        assert_eq!(state.counters().single_put, 1);
    }

    #[tokio::test]
    async fn test_should_upload_a_large_object_in_parts() {
        let (addr, state) = spawn_stub(Faults::default()).await;
        let uploader = uploader_for(addr, 0);
        let key = test_key("large");

        let payload = patterned(12 * 1024 * 1024);
        let response = uploader
            .upload(payload.clone(), &key, HeaderMap::new())
            .await
            .expect("upload");

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(state.object(&key).expect("stored"), payload);
        assert_eq!(state.open_sessions(), 0);

        let counters = state.counters();
        assert_eq!(counters.initiate, 1);
        assert_eq!(counters.part, 3);
        assert_eq!(counters.complete, 1);
        assert_eq!(counters.abort, 0);
        assert_eq!(counters.single_put, 0);
    }

    #[tokio::test]
    async fn test_should_upload_an_exact_part_size_object_in_parts() {
        let (addr, state) = spawn_stub(Faults::default()).await;
        let uploader = uploader_for(addr, 0);
        let key = test_key("boundary");

        let payload = patterned(5 * 1024 * 1024);
        uploader
            .upload(payload.clone(), &key, HeaderMap::new())
            .await
            .expect("upload");

        assert_eq!(state.object(&key).expect("stored"), payload);

        let counters = state.counters();
        assert_eq!(counters.initiate, 1);
        assert_eq!(counters.part, 1);
        assert_eq!(counters.complete, 1);
        assert_eq!(counters.single_put, 0);
    }

    #[tokio::test]
    async fn test_should_report_the_backend_error_body() {
        let faults = Faults {
            initiate: u32::MAX,
            ..Faults::default()
        };
        let (addr, state) = spawn_stub(faults).await;
        let uploader = uploader_for(addr, 1);
        let key = test_key("doomed");

        let err = uploader
            .upload(patterned(6 * 1024 * 1024), &key, HeaderMap::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("injected initiate failure"));
        assert_eq!(state.counters().abort, 0, "a failed initiate needs no cleanup");
    }
}
