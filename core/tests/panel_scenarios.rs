//! End-to-end behaviour of the panel controller over the shipped content.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use pmmap_core::ChartBackend;
use pmmap_core::ContentModel;
use pmmap_core::Fragment;
use pmmap_core::PanelController;
use pmmap_core::PanelState;
use pmmap_core::PanelVisual;
use pmmap_core::RendererKind;
use pmmap_core::TopicId;
use pmmap_core::chart::ChartEvent;
use pmmap_core::chart::RecordingBackend;
use pmmap_core::special::Role;
use pretty_assertions::assert_eq;

fn model() -> ContentModel {
    ContentModel::builtin().unwrap()
}

fn panel() -> (PanelController<RecordingBackend>, RecordingBackend) {
    let backend = RecordingBackend::new();
    (PanelController::new(backend.clone()), backend)
}

#[test]
fn generic_topics_render_one_fragment_per_item_in_order() {
    let model = model();
    let (mut panel, _) = panel();
    for topic in model
        .topics()
        .iter()
        .filter(|t| t.renderer() == RendererKind::Generic)
    {
        panel.show(topic).unwrap();
        let body = panel.body().unwrap();
        assert_eq!(body.fragments.len(), topic.items().len(), "{}", topic.id());
        let expected: Vec<Fragment> = topic
            .items()
            .iter()
            .map(pmmap_core::item_renderer::render_item)
            .collect();
        assert_eq!(body.fragments, expected);
    }
}

#[test]
fn scenario_a_tap_shows_seven_bullets_and_no_chart() {
    let model = model();
    let (mut panel, backend) = panel();
    let tap = model.topic("tap").unwrap();

    panel.show(tap).unwrap();

    assert_eq!(panel.state(), &PanelState::Open(TopicId::new("tap")));
    let body = panel.body().unwrap();
    assert_eq!(body.fragments.len(), 7);
    assert!(
        body.fragments
            .iter()
            .all(|f| matches!(f, Fragment::Bullet { .. }))
    );
    assert_eq!(
        body.fragments[0],
        Fragment::Bullet {
            text: "📜 Justificativa".to_string()
        }
    );
    assert!(!panel.has_live_chart());
    assert!(backend.events().is_empty());
}

#[test]
fn scenario_b_quality_shows_items_plus_one_chart() {
    let model = model();
    let (mut panel, backend) = panel();
    let quality = model.topic("qualidade").unwrap();

    panel.show(quality).unwrap();

    let body = panel.body().unwrap();
    assert_eq!(body.item_count(), quality.items().len());
    assert_eq!(
        body.fragments.last().and_then(|f| match f {
            Fragment::Chart { mount } => Some(mount.as_str()),
            _ => None,
        }),
        Some("quality-chart")
    );
    assert_eq!(backend.live(), 1);
    assert_eq!(
        backend.events(),
        vec![ChartEvent::Created {
            id: 1,
            mount: pmmap_core::ChartMount::new("quality-chart"),
            labels: vec![
                "Planejamento".to_string(),
                "Garantia (QA)".to_string(),
                "Controle (QC)".to_string(),
            ],
            values: vec![1.0, 1.0, 1.0],
        }]
    );
}

#[test]
fn scenario_c_switching_away_disposes_the_chart_once() {
    let model = model();
    let (mut panel, backend) = panel();

    panel.show(model.topic("qualidade").unwrap()).unwrap();
    panel.show(model.topic("tap").unwrap()).unwrap();

    let disposals = backend
        .events()
        .into_iter()
        .filter(|e| matches!(e, ChartEvent::Disposed { .. }))
        .count();
    assert_eq!(disposals, 1);
    assert_eq!(backend.live(), 0);
    assert!(!panel.has_live_chart());
    assert_eq!(panel.body().map(|b| b.title.as_str()), Some("TAP"));
}

#[test]
fn scenario_d_raci_renders_the_role_table_not_its_items() {
    let model = model();
    let (mut panel, _) = panel();
    let raci = model.topic("raci").unwrap();
    assert_eq!(raci.items().len(), 4);

    panel.show(raci).unwrap();

    let body = panel.body().unwrap();
    assert_eq!(body.fragments.len(), 1);
    let Fragment::RoleMatrix(matrix) = &body.fragments[0] else {
        panic!("expected role matrix, got {:?}", body.fragments[0]);
    };
    let roles: Vec<Role> = matrix.rows.iter().map(|r| r.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::Responsible,
            Role::Accountable,
            Role::Consulted,
            Role::Informed
        ]
    );
    assert_eq!(body.item_count(), 0);
}

#[test]
fn cause_effect_renders_six_categories_three_by_three() {
    let model = model();
    let (mut panel, _) = panel();
    let topic = model.topic("causa-efeito").unwrap();

    panel.show(topic).unwrap();

    let body = panel.body().unwrap();
    let [Fragment::CauseEffect(diagram)] = body.fragments.as_slice() else {
        panic!("expected a single diagram, got {:?}", body.fragments);
    };
    assert_eq!(diagram.top.len(), 3);
    assert_eq!(diagram.bottom.len(), 3);
    assert_eq!(
        diagram.categories().collect::<Vec<_>>(),
        vec![
            "Método",
            "Máquina",
            "Mão de Obra",
            "Material",
            "Medição",
            "Meio Ambiente"
        ]
    );
    assert_eq!(diagram.intro, topic.description());
}

#[test]
fn scenario_e_close_while_closed_is_a_no_op() {
    let (mut panel, _) = panel();
    assert!(!panel.close());
    assert_eq!(panel.state(), &PanelState::Closed);
    assert_eq!(panel.visual(), PanelVisual::CLOSED);
}

#[test]
fn closing_twice_matches_closing_once() {
    let model = model();
    let (mut panel, backend) = panel();
    panel.show(model.topic("qualidade").unwrap()).unwrap();
    assert_eq!(panel.visual(), PanelVisual::OPEN);

    assert!(panel.close());
    let after_once = (panel.state().clone(), panel.visual(), backend.events());
    assert!(!panel.close());
    let after_twice = (panel.state().clone(), panel.visual(), backend.events());

    assert_eq!(after_once, after_twice);
    assert_eq!(backend.live(), 0);
}

/// Walk a fixed pseudo-random sequence of show/close calls and check the
/// handle count after every step.
#[test]
fn at_most_one_live_chart_across_any_sequence() {
    let model = model();
    let (mut panel, backend) = panel();
    let topics = model.topics();
    let mut seed: u32 = 0x9e37_79b9;

    for _ in 0..500 {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let pick = seed as usize % (topics.len() + 1);
        if pick == topics.len() {
            panel.close();
            assert_eq!(backend.live(), 0);
        } else {
            let topic = &topics[pick];
            panel.show(topic).unwrap();
            let expected = usize::from(topic.renderer() == RendererKind::GenericPlusChart);
            assert_eq!(backend.live(), expected, "after show({})", topic.id());
        }
        assert!(backend.live() <= 1);
    }
}

/// A backend that refuses every chart after the first.
struct FlakyBackend {
    inner: RecordingBackend,
    calls: usize,
}

impl ChartBackend for FlakyBackend {
    type Handle = <RecordingBackend as ChartBackend>::Handle;

    fn create(
        &mut self,
        mount: &pmmap_core::ChartMount,
        spec: &pmmap_core::ChartSpec,
    ) -> Result<Self::Handle, pmmap_core::ChartError> {
        self.calls += 1;
        if self.calls > 1 {
            return Err(pmmap_core::ChartError::Backend {
                mount: mount.to_string(),
                reason: "exhausted".to_string(),
            });
        }
        self.inner.create(mount, spec)
    }
}

#[test]
fn failed_rerender_still_releases_previous_chart() {
    let model = model();
    let recorder = RecordingBackend::new();
    let mut panel = PanelController::new(FlakyBackend {
        inner: recorder.clone(),
        calls: 0,
    });
    let quality = model.topic("qualidade").unwrap();

    panel.show(quality).unwrap();
    assert_eq!(recorder.live(), 1);
    assert!(panel.show(quality).is_err());

    assert_eq!(recorder.live(), 0);
    assert!(panel.is_open());
    assert!(!panel.has_live_chart());
}
