use super::*;
use crate::test_support::*;
use shared::domain::ElementId;
use tokio::sync::Mutex;

struct ScriptedPrompt {
    answer: Option<String>,
    asked: Mutex<Vec<EditRequest>>,
}

impl ScriptedPrompt {
    fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.to_string()),
            asked: Mutex::new(Vec::new()),
        })
    }

    fn cancelling() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            asked: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl EditPrompt for ScriptedPrompt {
    async fn prompt(&self, request: EditRequest) -> Option<String> {
        self.asked.lock().await.push(request);
        self.answer.clone()
    }
}

async fn loaded() -> (Arc<TestProvider>, ElementStore) {
    let provider = Arc::new(TestProvider::new(vec![hydrogen(), helium()]));
    let store = ElementStore::new(provider.clone());
    store.load().await.expect("load");
    (provider, store)
}

#[tokio::test(start_paused = true)]
async fn prompt_shows_the_field_name_and_current_value() {
    let (_provider, store) = loaded().await;
    let prompt = ScriptedPrompt::cancelling();
    let coordinator = EditCoordinator::new(&store, prompt.clone());

    coordinator
        .request_edit(&hydrogen(), ElementField::Weight)
        .await
        .expect("edit");

    assert_eq!(
        *prompt.asked.lock().await,
        vec![EditRequest {
            title: "weight".to_string(),
            value: "1.0079".to_string(),
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_makes_no_store_call() {
    let (provider, store) = loaded().await;
    let coordinator = EditCoordinator::new(&store, ScriptedPrompt::cancelling());

    let outcome = coordinator
        .request_edit(&hydrogen(), ElementField::Name)
        .await
        .expect("edit");

    assert_eq!(outcome, EditOutcome::Cancelled);
    assert!(provider.recorded_updates().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn resubmitting_the_same_name_is_a_no_op() {
    let (provider, store) = loaded().await;
    let before = store.snapshot();
    let coordinator = EditCoordinator::new(&store, ScriptedPrompt::answering("Hydrogen"));

    let outcome = coordinator
        .request_edit(&hydrogen(), ElementField::Name)
        .await
        .expect("edit");

    assert_eq!(outcome, EditOutcome::Unchanged);
    assert!(provider.recorded_updates().await.is_empty());
    assert_eq!(store.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn numeric_input_that_reproduces_the_value_is_a_no_op() {
    let (provider, store) = loaded().await;
    let coordinator = EditCoordinator::new(&store, ScriptedPrompt::answering("1.00790"));

    let outcome = coordinator
        .request_edit(&hydrogen(), ElementField::Weight)
        .await
        .expect("edit");

    assert_eq!(outcome, EditOutcome::Unchanged);
    assert!(provider.recorded_updates().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn weight_input_is_merged_as_a_number() {
    let (provider, store) = loaded().await;
    let coordinator = EditCoordinator::new(&store, ScriptedPrompt::answering("4.002"));

    let outcome = coordinator
        .request_edit(&helium(), ElementField::Weight)
        .await
        .expect("edit");

    let mut expected = helium();
    expected.weight = 4.002;
    assert_eq!(outcome, EditOutcome::Submitted(expected.clone()));
    assert_eq!(store.element(ElementId(2)), Some(expected.clone()));
    assert_eq!(store.element(ElementId(1)), Some(hydrogen()));
    assert_eq!(
        provider.recorded_updates().await,
        vec![(ElementId(2), expected)]
    );
}

#[tokio::test(start_paused = true)]
async fn position_input_is_merged_as_an_integer() {
    let (_provider, store) = loaded().await;
    let coordinator = EditCoordinator::new(&store, ScriptedPrompt::answering(" 3 "));

    coordinator
        .request_edit(&hydrogen(), ElementField::Position)
        .await
        .expect("edit");

    assert_eq!(store.element(ElementId(1)).map(|e| e.position), Some(3));
}

#[tokio::test(start_paused = true)]
async fn text_fields_keep_input_verbatim() {
    let (_provider, store) = loaded().await;
    let coordinator = EditCoordinator::new(&store, ScriptedPrompt::answering("Hy "));

    coordinator
        .request_edit(&hydrogen(), ElementField::Symbol)
        .await
        .expect("edit");

    assert_eq!(
        store.element(ElementId(1)).map(|e| e.symbol),
        Some("Hy ".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn non_numeric_weight_abandons_the_edit() {
    let (provider, store) = loaded().await;
    let coordinator = EditCoordinator::new(&store, ScriptedPrompt::answering("heavy"));

    let outcome = coordinator
        .request_edit(&hydrogen(), ElementField::Weight)
        .await
        .expect("edit");

    assert!(matches!(
        outcome,
        EditOutcome::Abandoned(EditAbandon::Coercion(CoercionError {
            field: ElementField::Weight,
            ..
        }))
    ));
    assert!(provider.recorded_updates().await.is_empty());
    assert_eq!(store.element(ElementId(1)), Some(hydrogen()));
}

#[tokio::test(start_paused = true)]
async fn fractional_position_abandons_instead_of_reporting_unchanged() {
    let (provider, store) = loaded().await;
    let coordinator = EditCoordinator::new(&store, ScriptedPrompt::answering("1.5"));

    let outcome = coordinator
        .request_edit(&hydrogen(), ElementField::Position)
        .await
        .expect("edit");

    assert_eq!(
        outcome,
        EditOutcome::Abandoned(EditAbandon::Coercion(CoercionError {
            field: ElementField::Position,
            input: "1.5".to_string(),
        }))
    );
    assert!(provider.recorded_updates().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn empty_input_abandons_the_edit() {
    let (provider, store) = loaded().await;
    let coordinator = EditCoordinator::new(&store, ScriptedPrompt::answering(""));

    let outcome = coordinator
        .request_edit(&hydrogen(), ElementField::Name)
        .await
        .expect("edit");

    assert_eq!(outcome, EditOutcome::Abandoned(EditAbandon::EmptyValue));
    assert!(provider.recorded_updates().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn provider_failure_propagates_and_keeps_the_old_value() {
    let (provider, store) = loaded().await;
    provider.set_fail_update(true);
    let coordinator = EditCoordinator::new(&store, ScriptedPrompt::answering("Hydro"));

    let err = coordinator
        .request_edit(&hydrogen(), ElementField::Name)
        .await
        .expect_err("update fails");

    assert_eq!(err.message(), "update rejected");
    assert_eq!(store.element(ElementId(1)), Some(hydrogen()));
}
