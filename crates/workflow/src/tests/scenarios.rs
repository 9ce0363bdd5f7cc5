use super::*;
use crate::node::WorkflowNode;
use crate::research::ResearchNode;
use crate::router::{Router, RoutingDecision};
use crate::state::WorkflowState;
use crate::synthesis::SynthesisNode;
use grounded_core::ErrorKind;
use grounded_retrieval::NO_MATCHES_ANSWER;

const MINSKY: &str = "Who is Marvin Minsky?";
const PLATFORM: &str = "Propose a scalable architecture for our document search platform";
const AGENTS: &str =
    "Propose a scalable architecture for deploying thousands of specialized agents.";

fn router(retriever: FakeRetriever, generator: Arc<FakeGenerator>) -> Router {
    let retriever: Arc<dyn Retriever> = Arc::new(retriever);
    let engine = WorkflowEngine::new(
        retriever.clone(),
        generator,
        synthesis_prompt(),
        WorkflowSettings::default(),
    );
    Router::new(retriever, Arc::new(engine), WorkflowSettings::default())
}

#[tokio::test]
async fn factual_question_is_answered_from_citations() {
    let log = call_log();
    let retriever = FakeRetriever::new(
        vec![RetrievedItem::new(
            "Marvin Minsky was a cognitive scientist who co-founded the MIT AI Lab.",
            "ai_history.pdf",
        )],
        &log,
    );
    let generator = Arc::new(FakeGenerator::citing(&log));
    let router = router(retriever, generator.clone());

    assert_eq!(router.route(MINSKY), RoutingDecision::Direct);

    let answer = router.dispatch(MINSKY).await.unwrap();
    assert!(answer.contains("co-founded the MIT AI Lab"));
    assert!(answer.contains("ai_history.pdf"));
    assert_eq!(calls(&log), vec!["search:3"]);
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn direct_lookup_without_matches_says_so() {
    let log = call_log();
    let router = router(
        FakeRetriever::new(Vec::new(), &log),
        Arc::new(FakeGenerator::citing(&log)),
    );

    let answer = router.dispatch(MINSKY).await.unwrap();
    assert_eq!(answer, NO_MATCHES_ANSWER);
}

#[tokio::test]
async fn agent_deployment_proposal_is_researched_before_synthesis() {
    let log = call_log();
    let generator = Arc::new(FakeGenerator::citing(&log));
    let router = router(FakeRetriever::new(research_items(12), &log), generator.clone());

    assert_eq!(router.route(AGENTS), RoutingDecision::Workflow);

    let proposal = router.dispatch(AGENTS).await.unwrap();
    assert_eq!(calls(&log), vec!["search:10", "generate"]);
    assert!(proposal.contains("design-note-1.md"));
    assert!(generator.prompts()[0].contains(AGENTS));
}

#[tokio::test]
async fn planning_request_runs_research_then_synthesis() {
    let log = call_log();
    let retriever = FakeRetriever::new(research_items(12), &log);
    let generator = Arc::new(FakeGenerator::citing(&log));
    let router = router(retriever, generator.clone());

    assert_eq!(router.route(PLATFORM), RoutingDecision::Workflow);

    let proposal = router.dispatch(PLATFORM).await.unwrap();
    assert_eq!(calls(&log), vec!["search:10", "generate"]);
    assert!(proposal.contains("design-note-1.md"));

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.contains("[10] Finding 10"));
    assert!(!prompt.contains("[11]"));

    let persona = prompt.find("senior solutions architect").unwrap();
    let request = prompt.find(PLATFORM).unwrap();
    let research = prompt.find("[1] Finding 1 ").unwrap();
    assert!(persona < request && request < research);
}

#[tokio::test]
async fn empty_research_still_yields_a_caveated_proposal() {
    let log = call_log();
    let generator = Arc::new(FakeGenerator::citing(&log));
    let engine = engine(FakeRetriever::new(Vec::new(), &log), generator.clone());

    let proposal = engine.execute(PLATFORM).await.unwrap();
    assert!(!proposal.trim().is_empty());
    assert!(proposal.contains("not grounded"));
    assert!(generator.prompts()[0].contains("not grounded in the document corpus"));
}

#[tokio::test]
async fn retrieval_failure_stops_the_workflow() {
    let log = call_log();
    let generator = Arc::new(FakeGenerator::citing(&log));
    let engine = engine(FakeRetriever::failing("connection refused", &log), generator);

    let err = engine.execute(PLATFORM).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Retrieval);
    assert!(err.is_transient());
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(calls(&log), vec!["search:10"]);
}

#[tokio::test]
async fn retrieval_failure_leaves_the_proposal_unset() {
    let log = call_log();
    let node = ResearchNode::new(
        Arc::new(FakeRetriever::failing("HTTP 503", &log)),
        10,
        Duration::from_secs(30),
    );
    let mut state = WorkflowState::new(PLATFORM);

    assert!(node.run(&mut state).await.is_err());
    assert!(state.research_results().is_none());
    assert!(state.final_proposal().is_none());
}

#[tokio::test]
async fn generation_failure_is_propagated_without_placeholder() {
    let log = call_log();
    let generator = Arc::new(FakeGenerator::new(&log, |_| {
        Err(AppError::Generation("model overloaded".to_string()))
    }));
    let engine = engine(FakeRetriever::new(research_items(3), &log), generator);

    let err = engine.execute(PLATFORM).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generation);
    assert_eq!(calls(&log), vec!["search:10", "generate"]);
}

#[tokio::test]
async fn blank_generation_is_a_failure() {
    let log = call_log();
    let generator = Arc::new(FakeGenerator::new(&log, |_| Ok(" \n".to_string())));
    let engine = engine(FakeRetriever::new(research_items(2), &log), generator);

    let err = engine.execute(PLATFORM).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generation);
}

#[tokio::test]
async fn research_node_refuses_to_run_twice() {
    let log = call_log();
    let node = ResearchNode::new(
        Arc::new(FakeRetriever::new(research_items(2), &log)),
        10,
        Duration::from_secs(30),
    );
    let mut state = WorkflowState::new(PLATFORM);

    node.run(&mut state).await.unwrap();
    let err = node.run(&mut state).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WorkflowState);
    assert_eq!(state.research_results().unwrap().len(), 2);
    assert_eq!(calls(&log), vec!["search:10"]);
}

#[tokio::test]
async fn synthesis_refuses_to_run_before_research() {
    let log = call_log();
    let generator = Arc::new(FakeGenerator::citing(&log));
    let node = SynthesisNode::new(generator, synthesis_prompt(), Duration::from_secs(120));
    let mut state = WorkflowState::new(PLATFORM);

    let err = node.run(&mut state).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WorkflowState);
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn synthesis_refuses_to_overwrite_a_proposal() {
    let log = call_log();
    let generator = Arc::new(FakeGenerator::citing(&log));
    let node = SynthesisNode::new(generator, synthesis_prompt(), Duration::from_secs(120));
    let mut state = WorkflowState::new(PLATFORM);
    state.set_research_results(research_items(1)).unwrap();

    node.run(&mut state).await.unwrap();
    let first = state.final_proposal().unwrap().to_string();

    assert!(node.run(&mut state).await.is_err());
    assert_eq!(state.final_proposal(), Some(first.as_str()));
    assert_eq!(calls(&log), vec!["generate"]);
}

#[tokio::test(start_paused = true)]
async fn slow_search_times_out_as_retrieval_failure() {
    let log = call_log();
    let settings = WorkflowSettings {
        retrieval_timeout: Duration::from_secs(1),
        ..WorkflowSettings::default()
    };
    let engine = engine_with(
        FakeRetriever::new(research_items(3), &log).with_delay(Duration::from_secs(60)),
        Arc::new(FakeGenerator::citing(&log)),
        settings,
    );

    let err = engine.execute(PLATFORM).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Retrieval);
    assert!(err.to_string().contains("timed out"));
    assert_eq!(calls(&log), vec!["search:10"]);
}

#[tokio::test(start_paused = true)]
async fn slow_model_times_out_as_generation_failure() {
    let log = call_log();
    let settings = WorkflowSettings {
        generation_timeout: Duration::from_secs(2),
        ..WorkflowSettings::default()
    };
    let engine = engine_with(
        FakeRetriever::new(research_items(3), &log),
        Arc::new(FakeGenerator::citing(&log).with_delay(Duration::from_secs(600))),
        settings,
    );

    let err = engine.execute(PLATFORM).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generation);
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn cancelled_request_never_reaches_the_services() {
    let log = call_log();
    let engine = engine(
        FakeRetriever::new(research_items(3), &log),
        Arc::new(FakeGenerator::citing(&log)),
    );
    let token = CancellationToken::new();
    token.cancel();

    let err = engine.execute_with_cancel(PLATFORM, &token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn cancellation_during_research_skips_synthesis() {
    let log = call_log();
    let token = CancellationToken::new();
    let engine = engine(
        FakeRetriever::new(research_items(3), &log).cancelling(token.clone()),
        Arc::new(FakeGenerator::citing(&log)),
    );

    let err = engine.execute_with_cancel(PLATFORM, &token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(err.to_string().contains("synthesis"));
    assert_eq!(calls(&log), vec!["search:10"]);
}

#[tokio::test]
async fn cancelled_direct_lookup_is_reported() {
    let log = call_log();
    let router = router(
        FakeRetriever::new(research_items(3), &log),
        Arc::new(FakeGenerator::citing(&log)),
    );
    let token = CancellationToken::new();
    token.cancel();

    let err = router.dispatch_with_cancel(MINSKY, &token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn concurrent_invocations_do_not_share_state() {
    let log = call_log();
    let generator = Arc::new(FakeGenerator::new(&log, |prompt| Ok(prompt.to_string())));
    let engine = Arc::new(engine(
        FakeRetriever::new(research_items(4), &log),
        generator.clone(),
    ));

    let requests = [
        "Plan the storage tier migration",
        "Design a caching strategy for search results",
        "Propose an on-call roadmap",
    ];

    let runs = requests.iter().map(|request| {
        let engine = engine.clone();
        async move { engine.execute(request).await }
    });
    let proposals = futures::future::join_all(runs).await;

    for (request, proposal) in requests.iter().zip(proposals) {
        let proposal = proposal.unwrap();
        assert!(proposal.contains(request));
        for other in requests.iter().filter(|other| *other != request) {
            assert!(!proposal.contains(other));
        }
    }
    assert_eq!(generator.prompts().len(), 3);
}
