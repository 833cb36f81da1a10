//! Whole-flow journeys: drivers, controller, and session store together.

use crate::testing::{MockAuthApi, SharedMemoryStorage};
use crate::{
    AuthEvent, AuthFlowController, EmailStep, FlowStep, Identity, KvSessionStore,
    PasswordLoginStep, RegisterStep, RequestOtpStep, SessionStore, VerifyOtpStep,
};

fn fresh_controller(
    storage: &SharedMemoryStorage,
) -> AuthFlowController<KvSessionStore<SharedMemoryStorage>> {
    AuthFlowController::new(KvSessionStore::new(storage.clone()))
}

#[tokio::test]
async fn test_passcode_journey_with_retry_and_reload() {
    let storage = SharedMemoryStorage::new();
    let mut controller = fresh_controller(&storage);
    assert_eq!(controller.current_step(), FlowStep::EmailInput);

    // Email-first entry.
    controller.handle(EmailStep::submit("user@example.com").unwrap());
    controller.handle(AuthEvent::ChooseOtp);
    assert_eq!(controller.current_step(), FlowStep::RequestOtp);

    // Request a code.
    let api = MockAuthApi::new();
    let request = RequestOtpStep::new(controller.pending_email().unwrap());
    let attempt = controller.attempt();
    let outcome = request.submit(&api).await.unwrap();
    assert!(controller.resolve(attempt, outcome));
    assert_eq!(controller.current_step(), FlowStep::VerifyOtp);

    // Wrong code first: stay put, message shown, email kept.
    let api = MockAuthApi::new().with_verify_err("invalid or expired code");
    let verify = VerifyOtpStep::new(controller.pending_email().unwrap());
    let attempt = controller.attempt();
    let outcome = verify.submit(&api, "000000").await.unwrap();
    assert!(controller.resolve(attempt, outcome));
    assert_eq!(controller.current_step(), FlowStep::VerifyOtp);
    assert_eq!(controller.error(), Some("invalid or expired code"));
    assert_eq!(controller.pending_email(), Some("user@example.com"));

    // Right code: authenticated, error gone, identity persisted.
    let api = MockAuthApi::new();
    let attempt = controller.attempt();
    let outcome = verify.submit(&api, "123456").await.unwrap();
    assert!(controller.resolve(attempt, outcome));
    assert!(controller.is_authenticated());
    assert_eq!(controller.error(), None);
    assert_eq!(controller.current_user_id(), Some("user@example.com"));
    assert!(controller.is_user_verified());
    assert_eq!(api.verify_calls(), vec![(
        "user@example.com".to_string(),
        "123456".to_string()
    )]);

    // "Reload": a new controller over the same storage resumes the session.
    let mut reloaded = fresh_controller(&storage);
    assert_eq!(reloaded.current_step(), FlowStep::Authenticated);
    assert_eq!(reloaded.current_user_id(), Some("user@example.com"));
    assert!(reloaded.is_user_verified());
}

#[tokio::test]
async fn test_password_journey_then_logout_forgets_the_session() {
    let storage = SharedMemoryStorage::new();
    let mut controller = fresh_controller(&storage);

    controller.handle(EmailStep::submit("user@example.com").unwrap());
    controller.handle(AuthEvent::ChoosePassword);

    let api = MockAuthApi::new().with_login_ok(Identity::from_email("user@example.com"));
    let login = PasswordLoginStep::new(controller.pending_email().unwrap());
    let attempt = controller.attempt();
    let outcome = login.submit(&api, "hunter2").await.unwrap();
    controller.resolve(attempt, outcome);
    assert!(controller.is_authenticated());
    assert!(!storage.is_empty());

    controller.logout();
    assert_eq!(controller.current_step(), FlowStep::EmailInput);
    assert_eq!(controller.pending_email(), None);
    assert!(storage.is_empty());

    // The next visitor starts from scratch.
    let mut next = fresh_controller(&storage);
    assert_eq!(next.current_step(), FlowStep::EmailInput);
    assert_eq!(next.current_user_id(), None);
}

#[tokio::test]
async fn test_registration_journey_through_the_explicit_step() {
    let storage = SharedMemoryStorage::new();
    let mut controller = fresh_controller(&storage);

    controller.handle(EmailStep::submit("new@example.com").unwrap());
    controller.handle(AuthEvent::ChooseRegister);
    assert_eq!(controller.current_step(), FlowStep::RegisterWithPassword);

    let api = MockAuthApi::new();
    let register = RegisterStep::new(controller.pending_email().unwrap());
    let attempt = controller.attempt();
    let outcome = register.submit(&api).await.unwrap();
    controller.resolve(attempt, outcome);

    assert!(controller.is_authenticated());
    assert_eq!(controller.current_user_id(), Some("new@example.com"));
    assert_eq!(api.register_calls(), vec!["new@example.com".to_string()]);
}

#[tokio::test]
async fn test_direct_registration_from_the_method_chooser() {
    let storage = SharedMemoryStorage::new();
    let mut controller = fresh_controller(&storage);

    controller.handle(EmailStep::submit("new@example.com").unwrap());
    assert_eq!(controller.current_step(), FlowStep::ChooseMethod);

    // The chooser itself reports the registration outcome.
    let api = MockAuthApi::new();
    let register = RegisterStep::new(controller.pending_email().unwrap());
    let attempt = controller.attempt();
    let outcome = register.submit(&api).await.unwrap();
    controller.resolve(attempt, outcome);

    assert!(controller.is_authenticated());
}

#[tokio::test]
async fn test_back_abandons_the_in_flight_request() {
    let storage = SharedMemoryStorage::new();
    let mut controller = fresh_controller(&storage);

    controller.handle(EmailStep::submit("user@example.com").unwrap());
    controller.handle(AuthEvent::ChoosePassword);

    let api = MockAuthApi::new();
    let login = PasswordLoginStep::new(controller.pending_email().unwrap());

    // Dispatch, then navigate away before the response lands.
    let attempt = controller.attempt();
    controller.handle(AuthEvent::Back);
    assert_eq!(controller.current_step(), FlowStep::ChooseMethod);

    let outcome = login.submit(&api, "hunter2").await.unwrap();
    let applied = controller.resolve(attempt, outcome);

    assert!(!applied);
    assert_eq!(controller.current_step(), FlowStep::ChooseMethod);
    assert_eq!(controller.current_user_id(), None);
    assert!(storage.is_empty());

    // The flow is fully usable afterwards.
    controller.handle(AuthEvent::ChoosePassword);
    let attempt = controller.attempt();
    let outcome = login.submit(&api, "hunter2").await.unwrap();
    assert!(controller.resolve(attempt, outcome));
    assert!(controller.is_authenticated());
}

#[test]
fn test_fail_safe_storage_never_strands_the_user() {
    // Seed garbage: a flag with no identifier.
    let mut storage = SharedMemoryStorage::new();
    {
        use crate::session::USER_VERIFIED_KEY;
        use crate::KeyValueStorage;
        storage.set(USER_VERIFIED_KEY, "true").unwrap();
    }

    let mut controller = fresh_controller(&storage);
    assert_eq!(controller.current_step(), FlowStep::EmailInput);

    // A normal journey still works and overwrites the leftovers.
    controller.handle(AuthEvent::EmailSubmitted("user@example.com".to_string()));
    controller.handle(AuthEvent::LoginSucceeded(Identity::from_email(
        "user@example.com",
    )));
    assert!(controller.is_authenticated());

    let store = KvSessionStore::new(storage);
    assert_eq!(store.load().unwrap().id, "user@example.com");
}
