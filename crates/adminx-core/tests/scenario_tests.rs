//! End-to-end console scenarios

use adminx_access::Section;
use adminx_core::prelude::*;
use adminx_core::{
    demo, Console, GenerationError, LeadFilter, LeadStatus, PostFilter, PostForm, PromptKind, Session, Surface,
};
use adminx_test_utils::{quiet_config, setup_console, ScriptedGenerator, ScriptedStores, Step};
use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::{always, eq};
use pretty_assertions::assert_eq;
use std::sync::Arc;

mock! {
    pub Generator {}

    #[async_trait]
    impl TextGenerator for Generator {
        async fn generate(&self, kind: PromptKind, input: &str) -> Result<String, GenerationError>;
    }
}

fn id(raw: &str) -> ResourceId {
    ResourceId::new(raw)
}

#[tokio::test]
async fn viewer_is_denied_leads() {
    let (console, _) = setup_console(Role::Viewer, Arc::new(ScriptedGenerator::new())).await;

    assert!(console.nav().iter().any(|item| item.section == Section::Leads));

    let err = console.open(Section::Leads).unwrap_err();
    let surface = err.surface();
    assert!(!surface.is_dismissible());
    assert_eq!(
        surface,
        Surface::AccessDenied {
            message: "Unauthorized: your current role (viewer) does not permit this section.".into()
        }
    );
    assert!(console.leads("", LeadFilter::All).is_err());
    assert!(console
        .set_lead_status(&id("1"), LeadStatus::Closed)
        .await
        .unwrap_err()
        .is_permission_denied());
}

#[tokio::test(start_paused = true)]
async fn admin_toggles_service() {
    let (console, stores) = setup_console(Role::Admin, Arc::new(ScriptedGenerator::new())).await;
    stores.services.script([Step::ok(800)]);

    assert!(!console.toggle_service(&id("1")).await.unwrap());
    assert!(!console.services("")[0].enabled);
    assert!(!stores.services.row(&id("1")).unwrap().enabled);
    assert!(console.notices().errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn admin_toggle_failure_rolls_back() {
    let (console, stores) = setup_console(Role::Admin, Arc::new(ScriptedGenerator::new())).await;
    stores.services.script([Step::fail(800)]);

    let err = console.toggle_service(&id("1")).await.unwrap_err();
    assert!(matches!(err.surface(), Surface::Toast { .. }));
    assert!(err.surface().is_dismissible());
    assert!(console.services("")[0].enabled);

    let errors = console.notices().errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Failed to update service status.");
    assert!(console.notices().dismiss(errors[0].id));
    assert!(console.notices().errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn editor_publishes_draft_post() {
    let (console, stores) = setup_console(Role::Editor, Arc::new(ScriptedGenerator::new())).await;

    assert_eq!(console.posts("", PostFilter::Draft).len(), 1);
    assert!(console.toggle_post(&id("2")).await.unwrap());
    assert!(console.posts("", PostFilter::Draft).is_empty());
    assert!(stores.posts.row(&id("2")).unwrap().published);
}

#[tokio::test(start_paused = true)]
async fn failed_post_create_leaves_list_unchanged() {
    let (console, stores) = setup_console(Role::Editor, Arc::new(ScriptedGenerator::new())).await;
    stores.posts.script([Step::fail(1000)]);

    let err = console
        .save_post(
            None,
            PostForm {
                title: "Launch Notes".into(),
                content: "We shipped.".into(),
                ..PostForm::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Mutation(MutationError::RolledBack { .. })));
    assert_eq!(console.posts("", PostFilter::All).len(), 2);
    assert_eq!(console.notices().errors()[0].message, "Failed to create post.");
}

#[tokio::test(start_paused = true)]
async fn lead_pipeline_for_admin() {
    let generator = Arc::new(ScriptedGenerator::new());
    let (console, stores) = setup_console(Role::Admin, generator.clone()).await;

    let new_leads = console.leads("", LeadFilter::Status(LeadStatus::New)).unwrap();
    assert_eq!(new_leads.len(), 2);

    console.set_lead_status(&id("3"), LeadStatus::Contacted).await.unwrap();
    assert_eq!(stores.leads.row(&id("3")).unwrap().status, LeadStatus::Contacted);
    assert_eq!(
        console.notices().active().last().unwrap().message,
        "Lead marked as contacted"
    );

    console.summarize_lead(&id("3")).await.unwrap();
    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].0, PromptKind::SummarizeLead);
    assert!(prompts[0].1.starts_with("Name: Bob Wilson, Email: bob@corp.com"));
}

#[tokio::test(start_paused = true)]
async fn owner_assigns_roles() {
    let (console, stores) = setup_console(Role::Owner, Arc::new(ScriptedGenerator::new())).await;

    console.assign_role(&id("4"), Role::Editor).await.unwrap();
    assert_eq!(stores.users.row(&id("4")).unwrap().role, Role::Editor);

    let (admin, _) = setup_console(Role::Admin, Arc::new(ScriptedGenerator::new())).await;
    assert!(admin
        .assign_role(&id("4"), Role::Owner)
        .await
        .unwrap_err()
        .is_permission_denied());
}

#[tokio::test]
async fn failed_generation_leaves_field_untouched() {
    let generator = Arc::new(ScriptedGenerator::with_replies([Err("quota exceeded".to_string())]));
    let (console, _) = setup_console(Role::Editor, generator.clone()).await;

    let draft = "Our team builds things.".to_string();
    let mut content = draft.clone();
    let err = console
        .fill_field(PromptKind::Rewrite, &draft, &mut content)
        .await
        .unwrap_err();
    assert_eq!(content, "Our team builds things.");
    assert_eq!(
        err.surface(),
        Surface::Inline {
            message: "AI was unable to generate text. Try again or enter it manually.".into(),
            retry: true,
        }
    );

    // Retry succeeds with the echo reply.
    console
        .fill_field(PromptKind::Rewrite, &draft, &mut content)
        .await
        .unwrap();
    assert_eq!(content, "rewrite: Our team builds things.");
}

#[tokio::test]
async fn blank_input_never_reaches_the_generator() {
    let mut generator = MockGenerator::new();
    generator.expect_generate().never();

    let stores = ScriptedStores::demo();
    let console = Console::new(
        Session::start(demo::current_user(Role::Editor)),
        stores.as_stores(),
        Arc::new(generator),
        quiet_config(),
    );

    let err = console.generate(PromptKind::ServiceDescription, "   ").await.unwrap_err();
    assert!(matches!(err, ConsoleError::Generation(GenerationError::EmptyInput)));
}

#[tokio::test]
async fn service_description_uses_title() {
    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .with(eq(PromptKind::ServiceDescription), always())
        .times(1)
        .returning(|_, input| Ok(format!("{input} that converts.")));

    let stores = ScriptedStores::demo();
    let console = Console::new(
        Session::start(demo::current_user(Role::Admin)),
        stores.as_stores(),
        Arc::new(generator),
        quiet_config(),
    );

    let text = console
        .generate(PromptKind::ServiceDescription, "SEO Optimization")
        .await
        .unwrap();
    assert_eq!(text, "SEO Optimization that converts.");
}

#[tokio::test(start_paused = true)]
async fn logout_ends_session() {
    let (console, _) = setup_console(Role::Owner, Arc::new(ScriptedGenerator::new())).await;
    let session_id = console.session().id();
    let receipt = console.logout();
    assert_eq!(receipt.session_id, session_id);
    assert_eq!(receipt.user_id, "1");
}
