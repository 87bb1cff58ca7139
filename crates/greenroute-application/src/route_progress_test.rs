#[cfg(test)]
mod tests {
    use crate::route_progress::RouteProgress;
    use async_trait::async_trait;
    use greenroute_core::error::{Result, RouteError};
    use greenroute_core::gateway::wire::{
        Ack, AssignmentAuthRequest, AssignmentAuthResponse, LegacyAuthRequest, LegacyAuthResponse,
        PickupStatus, PickupStatusUpdate, RemoteProgress, StopResponse, StopStarted, TripStarted,
    };
    use greenroute_core::gateway::{AssignmentGateway, LegacyGateway};
    use greenroute_core::ids::{AssignmentId, DriverId};
    use greenroute_core::protocol::ProtocolVersion;
    use greenroute_core::session::{RouteState, Session, SessionStore};
    use greenroute_core::stop::{
        CompletionPayload, DEFAULT_ADDRESS, DEFAULT_CUSTOMER_NAME, PickupRecord, StopOutcome,
        StopSnapshot,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const VEHICLE: &str = "KA01AB1234";
    const LICENSE: &str = "DL0420110012345";

    // Mock SessionStore for testing
    #[derive(Default)]
    struct MockSessionStore {
        session: Mutex<Option<Session>>,
        puts: AtomicUsize,
    }

    impl MockSessionStore {
        fn stored(&self) -> Option<Session> {
            self.session.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SessionStore for MockSessionStore {
        async fn get(&self) -> Result<Option<Session>> {
            Ok(self.session.lock().unwrap().clone())
        }

        async fn put(&self, session: &Session) -> Result<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            *self.session.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        async fn delete(&self) -> Result<()> {
            *self.session.lock().unwrap() = None;
            Ok(())
        }
    }

    // Mock AssignmentGateway for testing
    struct MockAssignmentGateway {
        auth_response: Mutex<AssignmentAuthResponse>,
        complete_failures: Mutex<Vec<RouteError>>,
        fetch_failures: Mutex<Vec<RouteError>>,
        completed_sequences: Mutex<Vec<u32>>,
        start_trip_fails: bool,
        end_trip_fails: bool,
        completes: AtomicUsize,
        fetches: AtomicUsize,
        start_trips: AtomicUsize,
        end_trips: AtomicUsize,
    }

    impl MockAssignmentGateway {
        fn with_stops(total_stops: u32) -> Self {
            Self {
                auth_response: Mutex::new(AssignmentAuthResponse {
                    assignment_id: Some("501".into()),
                    driver_dl: Some(LICENSE.into()),
                    vehicle_no: Some(VEHICLE.into()),
                    total_stops: Some(total_stops),
                    driver_name: Some("Ravi Kumar".into()),
                    route_date: Some("2024-03-01".into()),
                    current_stop: Some(StopSnapshot {
                        customer_name: Some("Stop 1".into()),
                        sequence: Some(1),
                        ..Default::default()
                    }),
                }),
                complete_failures: Mutex::new(Vec::new()),
                fetch_failures: Mutex::new(Vec::new()),
                completed_sequences: Mutex::new(Vec::new()),
                start_trip_fails: false,
                end_trip_fails: false,
                completes: AtomicUsize::new(0),
                fetches: AtomicUsize::new(0),
                start_trips: AtomicUsize::new(0),
                end_trips: AtomicUsize::new(0),
            }
        }

        fn fail_next_complete(&self, err: RouteError) {
            self.complete_failures.lock().unwrap().push(err);
        }

        fn fail_next_fetch(&self, err: RouteError) {
            self.fetch_failures.lock().unwrap().push(err);
        }
    }

    #[async_trait]
    impl AssignmentGateway for MockAssignmentGateway {
        async fn authenticate(
            &self,
            _request: &AssignmentAuthRequest,
        ) -> Result<AssignmentAuthResponse> {
            Ok(self.auth_response.lock().unwrap().clone())
        }

        async fn fetch_stop(&self, _assignment: &AssignmentId, sequence: u32) -> Result<StopResponse> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.fetch_failures.lock().unwrap().pop() {
                return Err(err);
            }
            Ok(StopResponse {
                stop: Some(StopSnapshot {
                    customer_name: Some(format!("Stop {sequence}")),
                    sequence: Some(sequence),
                    ..Default::default()
                }),
                sequence: Some(sequence),
                is_last: None,
            })
        }

        async fn start_trip(&self, _assignment: &AssignmentId) -> Result<TripStarted> {
            self.start_trips.fetch_add(1, Ordering::SeqCst);
            if self.start_trip_fails {
                return Err(RouteError::network("connection reset"));
            }
            Ok(TripStarted {
                trip_started_at: Some("2024-03-01T07:00:00Z".into()),
            })
        }

        async fn end_trip(&self, _assignment: &AssignmentId) -> Result<Ack> {
            self.end_trips.fetch_add(1, Ordering::SeqCst);
            if self.end_trip_fails {
                return Err(RouteError::rejected(500, "end trip failed"));
            }
            Ok(Ack::default())
        }

        async fn start_stop(&self, _assignment: &AssignmentId, _sequence: u32) -> Result<StopStarted> {
            Ok(StopStarted {
                pickup_started_at: Some("2024-03-01T08:15:00Z".into()),
            })
        }

        async fn complete_stop(
            &self,
            _assignment: &AssignmentId,
            sequence: u32,
            _payload: &CompletionPayload,
        ) -> Result<Ack> {
            if let Some(err) = self.complete_failures.lock().unwrap().pop() {
                return Err(err);
            }
            self.completes.fetch_add(1, Ordering::SeqCst);
            self.completed_sequences.lock().unwrap().push(sequence);
            Ok(Ack::default())
        }

        async fn progress(&self, _assignment: &AssignmentId) -> Result<RemoteProgress> {
            Ok(RemoteProgress {
                current: Some(2),
                total: Some(3),
                next_stop: None,
            })
        }
    }

    // Mock LegacyGateway for testing
    struct MockLegacyGateway {
        total: usize,
        updates: Mutex<Vec<(usize, PickupStatusUpdate)>>,
        fetch_fails: Mutex<bool>,
    }

    impl MockLegacyGateway {
        fn with_pickups(total: usize) -> Self {
            Self {
                total,
                updates: Mutex::new(Vec::new()),
                fetch_fails: Mutex::new(false),
            }
        }

        fn pickup(index: usize) -> PickupRecord {
            PickupRecord {
                id: Some(format!("P{index}")),
                customer_name: Some(format!("Pickup {index}")),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl LegacyGateway for MockLegacyGateway {
        async fn authenticate(&self, _request: &LegacyAuthRequest) -> Result<LegacyAuthResponse> {
            Ok(LegacyAuthResponse {
                driver_id: Some("7".into()),
                driver_name: Some("Asha".into()),
                vehicle_number: None,
                pickups: (0..self.total).map(Self::pickup).collect(),
                total_pickups: Some(self.total),
            })
        }

        async fn fetch_pickup(&self, _driver: &DriverId, index: usize) -> Result<PickupRecord> {
            if *self.fetch_fails.lock().unwrap() {
                return Err(RouteError::timeout("fetch pickup", 30));
            }
            Ok(Self::pickup(index))
        }

        async fn update_pickup_status(
            &self,
            _driver: &DriverId,
            index: usize,
            update: &PickupStatusUpdate,
        ) -> Result<Ack> {
            self.updates.lock().unwrap().push((index, update.clone()));
            Ok(Ack::default())
        }

        async fn list_pickups(&self, _driver: &DriverId) -> Result<Vec<PickupRecord>> {
            Ok((0..self.total + 1).map(Self::pickup).collect())
        }
    }

    struct Harness {
        store: Arc<MockSessionStore>,
        current: Arc<MockAssignmentGateway>,
        legacy: Arc<MockLegacyGateway>,
        progress: RouteProgress,
    }

    fn harness(
        current: MockAssignmentGateway,
        legacy: MockLegacyGateway,
        protocol: ProtocolVersion,
    ) -> Harness {
        let store = Arc::new(MockSessionStore::default());
        let current = Arc::new(current);
        let legacy = Arc::new(legacy);
        let progress = RouteProgress::new(store.clone(), current.clone(), legacy.clone(), protocol);
        Harness {
            store,
            current,
            legacy,
            progress,
        }
    }

    fn current_harness(total_stops: u32) -> Harness {
        harness(
            MockAssignmentGateway::with_stops(total_stops),
            MockLegacyGateway::with_pickups(0),
            ProtocolVersion::Current,
        )
    }

    fn legacy_harness(total: usize) -> Harness {
        harness(
            MockAssignmentGateway::with_stops(1),
            MockLegacyGateway::with_pickups(total),
            ProtocolVersion::Legacy,
        )
    }

    fn sequence_of(store: &MockSessionStore) -> u32 {
        match store.stored() {
            Some(Session::Current(s)) => s.current_sequence,
            other => panic!("expected current session, got {other:?}"),
        }
    }

    fn index_of(store: &MockSessionStore) -> usize {
        match store.stored() {
            Some(Session::Legacy(s)) => s.current_pickup_index,
            other => panic!("expected legacy session, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_persists_and_starts_trip() {
        let h = current_harness(3);
        let session = h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        assert_eq!(session.protocol(), ProtocolVersion::Current);
        assert_eq!(h.store.stored(), Some(session.clone()));
        assert_eq!(h.current.start_trips.load(Ordering::SeqCst), 1);
        match session {
            Session::Current(s) => {
                assert_eq!(s.trip_started_at.as_deref(), Some("2024-03-01T07:00:00Z"));
                assert_eq!(s.current_sequence, 1);
            }
            Session::Legacy(_) => panic!("expected current session"),
        }
        assert_eq!(h.progress.state().await.unwrap(), RouteState::Authenticated);
    }

    #[tokio::test]
    async fn test_start_trip_failure_does_not_fail_login() {
        let mut gateway = MockAssignmentGateway::with_stops(3);
        gateway.start_trip_fails = true;
        let h = harness(gateway, MockLegacyGateway::with_pickups(0), ProtocolVersion::Current);

        let session = h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        match session {
            Session::Current(s) => assert!(s.trip_started_at.is_none()),
            Session::Legacy(_) => panic!("expected current session"),
        }
        assert!(h.progress.is_logged_in().await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_credentials_never_reach_gateway() {
        let h = current_harness(3);
        let err = h.progress.authenticate("KA01", LICENSE).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(h.current.start_trips.load(Ordering::SeqCst), 0);
        assert!(h.store.stored().is_none());
    }

    #[tokio::test]
    async fn test_incomplete_auth_response_persists_nothing() {
        let h = current_harness(3);
        h.current.auth_response.lock().unwrap().current_stop = None;

        let err = h.progress.authenticate(VEHICLE, LICENSE).await.unwrap_err();
        assert_eq!(err, RouteError::incomplete(["current_stop"]));
        assert!(h.store.stored().is_none());
        assert_eq!(h.store.puts.load(Ordering::SeqCst), 0);
        assert_eq!(h.current.start_trips.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_three_stop_route_completes_with_one_end_trip() {
        let h = current_harness(3);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        let payload = CompletionPayload::new().with_weight(4.2);

        let first = h.progress.complete_current_stop(&payload).await.unwrap();
        assert_eq!(sequence_of(&h.store), 2);
        match first {
            StopOutcome::Next(view) => {
                assert_eq!(view.position, 2);
                assert_eq!(view.customer_name, "Stop 2");
            }
            other => panic!("expected next stop, got {other:?}"),
        }

        h.progress.complete_current_stop(&payload).await.unwrap();
        assert_eq!(sequence_of(&h.store), 3);

        let last = h.progress.complete_current_stop(&payload).await.unwrap();
        assert_eq!(last, StopOutcome::RouteComplete { total: 3 });
        assert_eq!(sequence_of(&h.store), 4);
        assert_eq!(h.current.end_trips.load(Ordering::SeqCst), 1);
        assert_eq!(h.current.completes.load(Ordering::SeqCst), 3);

        let again = h.progress.complete_current_stop(&payload).await.unwrap_err();
        assert!(again.is_route_complete());
        assert_eq!(h.current.end_trips.load(Ordering::SeqCst), 1);
        assert_eq!(h.current.completes.load(Ordering::SeqCst), 3);
        assert_eq!(h.progress.state().await.unwrap(), RouteState::RouteComplete);
        assert!(h.progress.current_stop().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_n_completions_advance_by_n() {
        let h = current_harness(10);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        for n in 1..=6u32 {
            h.progress
                .complete_current_stop(&CompletionPayload::new())
                .await
                .unwrap();
            assert_eq!(sequence_of(&h.store), 1 + n);
        }
    }

    #[tokio::test]
    async fn test_failed_completion_leaves_sequence_and_retry_is_safe() {
        let h = current_harness(3);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        h.current.fail_next_complete(RouteError::timeout("complete stop", 60));
        let err = h
            .progress
            .complete_current_stop(&CompletionPayload::new())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(sequence_of(&h.store), 1);

        let progress = h.progress.progress().await.unwrap().unwrap();
        assert_eq!(progress.current, 1);
        assert_eq!(progress.percentage, 33);

        h.progress
            .complete_current_stop(&CompletionPayload::new())
            .await
            .unwrap();
        assert_eq!(sequence_of(&h.store), 2);
    }

    #[tokio::test]
    async fn test_next_stop_fetch_failure_keeps_completed_advance() {
        let h = current_harness(3);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        let payload = CompletionPayload::new().with_weight(2.5);

        h.current.fail_next_fetch(RouteError::timeout("fetch stop", 30));
        let outcome = h.progress.complete_current_stop(&payload).await.unwrap();
        match outcome {
            StopOutcome::Next(view) => {
                assert_eq!(view.position, 2);
                assert_eq!(view.total, 3);
                assert_eq!(view.customer_name, DEFAULT_CUSTOMER_NAME);
                assert_eq!(view.address, DEFAULT_ADDRESS);
            }
            other => panic!("expected next stop, got {other:?}"),
        }
        assert_eq!(sequence_of(&h.store), 2);
        assert_eq!(h.progress.progress().await.unwrap().unwrap().current, 2);

        // The cache stayed empty, so the next lookup goes to the server.
        let view = h.progress.current_stop().await.unwrap().unwrap();
        assert_eq!(view.customer_name, "Stop 2");

        h.progress.complete_current_stop(&payload).await.unwrap();
        assert_eq!(*h.current.completed_sequences.lock().unwrap(), vec![1, 2]);
        assert_eq!(sequence_of(&h.store), 3);
    }

    #[tokio::test]
    async fn test_login_rejects_current_stop_past_last_stop() {
        let h = current_harness(3);
        if let Some(stop) = h.current.auth_response.lock().unwrap().current_stop.as_mut() {
            stop.sequence = Some(4);
        }

        let err = h.progress.authenticate(VEHICLE, LICENSE).await.unwrap_err();
        assert!(matches!(err, RouteError::MalformedResponse(_)));
        assert!(h.store.stored().is_none());
        assert_eq!(h.current.start_trips.load(Ordering::SeqCst), 0);
        assert_eq!(h.progress.state().await.unwrap(), RouteState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_navigation_to_current_stop() {
        let h = current_harness(3);
        assert!(h.progress.navigation().await.unwrap().is_none());

        if let Some(stop) = h.current.auth_response.lock().unwrap().current_stop.as_mut() {
            stop.address = Some("4 Park St".into());
            stop.latitude = Some(12.5);
            stop.longitude = Some(77.25);
        }
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        let nav = h.progress.navigation().await.unwrap().unwrap();
        assert_eq!(nav.position, 1);
        assert_eq!(nav.customer_name, "Stop 1");
        assert!(nav.url.ends_with("destination=12.5,77.25&destination_place_id=4%20Park%20St"));

        // Fetched stops carry no coordinates.
        h.progress
            .complete_current_stop(&CompletionPayload::new())
            .await
            .unwrap();
        assert!(h.progress.navigation().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_end_trip_failure_still_completes_route() {
        let mut gateway = MockAssignmentGateway::with_stops(1);
        gateway.end_trip_fails = true;
        let h = harness(gateway, MockLegacyGateway::with_pickups(0), ProtocolVersion::Current);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        let outcome = h
            .progress
            .complete_current_stop(&CompletionPayload::new())
            .await
            .unwrap();
        assert!(outcome.is_route_complete());
        assert_eq!(h.current.end_trips.load(Ordering::SeqCst), 1);
        let progress = h.progress.progress().await.unwrap().unwrap();
        assert!(progress.complete);
        assert_eq!(progress.percentage, 100);
    }

    #[tokio::test]
    async fn test_invalid_weight_rejected_before_network() {
        let h = current_harness(3);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        let err = h
            .progress
            .complete_current_stop(&CompletionPayload::new().with_weight(0.0))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(h.current.completes.load(Ordering::SeqCst), 0);
        assert_eq!(sequence_of(&h.store), 1);
    }

    #[tokio::test]
    async fn test_operations_without_session() {
        let h = current_harness(3);
        assert!(h.progress.current_stop().await.unwrap().is_none());
        assert!(h.progress.progress().await.unwrap().is_none());
        assert_eq!(h.progress.state().await.unwrap(), RouteState::Unauthenticated);
        assert_eq!(
            h.progress
                .complete_current_stop(&CompletionPayload::new())
                .await
                .unwrap_err(),
            RouteError::NoActiveSession
        );
        h.progress.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_current_stop_uses_cache_then_fetches() {
        let h = current_harness(3);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        let view = h.progress.current_stop().await.unwrap().unwrap();
        assert_eq!(view.customer_name, "Stop 1");
        assert_eq!(h.current.fetches.load(Ordering::SeqCst), 0);

        // Drop the cached snapshot to force a fetch.
        if let Some(Session::Current(mut s)) = h.store.stored() {
            s.current_stop = None;
            *h.store.session.lock().unwrap() = Some(Session::Current(s));
        }
        let view = h.progress.current_stop().await.unwrap().unwrap();
        assert_eq!(view.customer_name, "Stop 1");
        assert_eq!(h.current.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(sequence_of(&h.store), 1);
    }

    #[tokio::test]
    async fn test_start_stop_marks_pickup_in_progress() {
        let h = current_harness(2);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        let started = h.progress.start_current_stop().await.unwrap();
        assert_eq!(started.pickup_started_at.as_deref(), Some("2024-03-01T08:15:00Z"));
        assert_eq!(h.progress.state().await.unwrap(), RouteState::PickupInProgress);

        h.progress
            .complete_current_stop(&CompletionPayload::new())
            .await
            .unwrap();
        assert_eq!(h.progress.state().await.unwrap(), RouteState::Authenticated);
    }

    #[tokio::test]
    async fn test_current_protocol_rejects_skip() {
        let h = current_harness(3);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        let err = h.progress.skip_current_stop("closed").await.unwrap_err();
        assert!(matches!(err, RouteError::UnsupportedOperation { .. }));
        assert_eq!(sequence_of(&h.store), 1);
        assert!(h.progress.refresh_pickups().await.is_err());
    }

    #[tokio::test]
    async fn test_remote_progress() {
        let h = current_harness(3);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        let remote = h.progress.remote_progress().await.unwrap();
        assert_eq!(remote.current, Some(2));
        assert_eq!(remote.total, Some(3));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let h = current_harness(3);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        h.progress.logout().await.unwrap();
        h.progress.logout().await.unwrap();
        assert!(!h.progress.is_logged_in().await.unwrap());
    }

    #[tokio::test]
    async fn test_new_login_replaces_previous_session() {
        let h = current_harness(3);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        h.progress
            .complete_current_stop(&CompletionPayload::new())
            .await
            .unwrap();
        assert_eq!(sequence_of(&h.store), 2);

        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        assert_eq!(sequence_of(&h.store), 1);
    }

    #[tokio::test]
    async fn test_legacy_skip_advances_by_one_without_trip_calls() {
        let h = legacy_harness(3);
        let session = h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        assert_eq!(session.protocol(), ProtocolVersion::Legacy);

        let outcome = h.progress.skip_current_stop("not present").await.unwrap();
        assert_eq!(index_of(&h.store), 1);
        match outcome {
            StopOutcome::Next(view) => assert_eq!(view.position, 2),
            other => panic!("expected next pickup, got {other:?}"),
        }

        let updates = h.legacy.updates.lock().unwrap().clone();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, 0);
        assert_eq!(updates[0].1.status, PickupStatus::Skipped);
        assert_eq!(updates[0].1.skip_reason.as_deref(), Some("not present"));

        assert_eq!(h.current.start_trips.load(Ordering::SeqCst), 0);
        assert_eq!(h.current.end_trips.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_legacy_index_waits_for_next_pickup_fetch() {
        let h = legacy_harness(3);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        *h.legacy.fetch_fails.lock().unwrap() = true;
        let err = h
            .progress
            .complete_current_stop(&CompletionPayload::new())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(index_of(&h.store), 0);

        *h.legacy.fetch_fails.lock().unwrap() = false;
        h.progress
            .complete_current_stop(&CompletionPayload::new())
            .await
            .unwrap();
        assert_eq!(index_of(&h.store), 1);
    }

    #[tokio::test]
    async fn test_legacy_route_completion_and_progress() {
        let h = legacy_harness(2);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        let progress = h.progress.progress().await.unwrap().unwrap();
        assert_eq!((progress.current, progress.total, progress.percentage), (1, 2, 50));

        h.progress
            .complete_current_stop(&CompletionPayload::new().with_notes("ok"))
            .await
            .unwrap();
        let outcome = h.progress.skip_current_stop("gate locked").await.unwrap();
        assert_eq!(outcome, StopOutcome::RouteComplete { total: 2 });

        let progress = h.progress.progress().await.unwrap().unwrap();
        assert!(progress.complete);
        assert_eq!((progress.current, progress.percentage, progress.remaining), (2, 100, 0));

        let err = h.progress.skip_current_stop("again").await.unwrap_err();
        assert!(err.is_route_complete());
        assert_eq!(h.legacy.updates.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_legacy_start_stop_unsupported() {
        let h = legacy_harness(2);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        let err = h.progress.start_current_stop().await.unwrap_err();
        assert!(matches!(err, RouteError::UnsupportedOperation { .. }));
        assert!(h.progress.remote_progress().await.is_err());
    }

    #[tokio::test]
    async fn test_legacy_refresh_keeps_index() {
        let h = legacy_harness(2);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();
        h.progress.skip_current_stop("closed").await.unwrap();

        let count = h.progress.refresh_pickups().await.unwrap();
        assert_eq!(count, 3);
        assert_eq!(index_of(&h.store), 1);
    }

    #[tokio::test]
    async fn test_zero_pickup_legacy_route_is_complete() {
        let h = legacy_harness(0);
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        let progress = h.progress.progress().await.unwrap().unwrap();
        assert_eq!(progress.percentage, 100);
        assert_eq!(h.progress.state().await.unwrap(), RouteState::RouteComplete);
        assert!(h.progress.current_stop().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_operations_are_serialized() {
        let h = Arc::new(current_harness(5));
        h.progress.authenticate(VEHICLE, LICENSE).await.unwrap();

        let a = {
            let h = h.clone();
            async move { h.progress.complete_current_stop(&CompletionPayload::new()).await }
        };
        let b = {
            let h = h.clone();
            async move { h.progress.complete_current_stop(&CompletionPayload::new()).await }
        };
        let (ra, rb) = tokio::join!(a, b);
        ra.unwrap();
        rb.unwrap();
        assert_eq!(sequence_of(&h.store), 3);
        assert_eq!(h.current.completes.load(Ordering::SeqCst), 2);
    }
}
