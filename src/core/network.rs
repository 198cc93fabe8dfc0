//! Layered-graph animation for the neural-network page.
//!
//! The layout is fixed once built; only emphasis (fill, radius, stroke, width, opacity and the
//! transient gradient markers) changes as a scripted pass plays. [`NeuralNetworkView`] is the
//! state machine, [`NetworkAnimator`] plays its scripts against a scheduler.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::Scheduler;
use crate::config::SequenceTiming;
use crate::draw::{palette, Color, Scene, Shape, Style, TextAnchor};
use crate::driver::RenderSink;
use crate::error::{Result, VizError};
use crate::handle::AnimationHandle;
use crate::sequencer::Script;

// ═══════════════════════════════════════════════════════════════════════════
// Layout
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayerSpec {
    pub name: String,
    pub neurons: usize,
    /// Horizontal position of the layer's column.
    pub x: f64,
}

impl LayerSpec {
    pub fn new(name: impl Into<String>, neurons: usize, x: f64) -> Self {
        Self {
            name: name.into(),
            neurons,
            x,
        }
    }
}

/// One dense edge between adjacent layers, `layer` -> `layer + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub layer: usize,
    pub from: usize,
    pub to: usize,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Connection {
    pub fn midpoint(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkLayout {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub layers: Vec<LayerSpec>,
    /// Labels drawn left of the first layer, one per input neuron.
    pub input_labels: Vec<String>,
    /// Neurons lit per layer during the forward pass.
    pub forward_pattern: Vec<Vec<usize>>,
}

impl NetworkLayout {
    /// The 4-5-4-1 network predicting energy production from weather inputs.
    pub fn energy_prediction() -> Self {
        Self {
            title: "Energy Production Prediction".to_string(),
            width: 600.0,
            height: 400.0,
            layers: vec![
                LayerSpec::new("Input Layer", 4, 50.0),
                LayerSpec::new("Hidden Layer 1", 5, 200.0),
                LayerSpec::new("Hidden Layer 2", 4, 350.0),
                LayerSpec::new("Output Layer", 1, 500.0),
            ],
            input_labels: ["Time of Day", "Temperature", "Cloud Cover", "Wind Speed"]
                .into_iter()
                .map(String::from)
                .collect(),
            forward_pattern: vec![vec![0, 2], vec![1, 3], vec![0, 2], vec![0]],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(VizError::InvalidConfig("canvas must have positive size"));
        }
        if self.layers.is_empty() {
            return Err(VizError::InvalidConfig("network needs at least one layer"));
        }
        if self.layers.iter().any(|l| l.neurons == 0) {
            return Err(VizError::InvalidConfig("every layer needs at least one neuron"));
        }
        if self.forward_pattern.len() != self.layers.len() {
            return Err(VizError::InvalidConfig(
                "forward pattern must list every layer",
            ));
        }
        let out_of_range = self
            .forward_pattern
            .iter()
            .zip(&self.layers)
            .any(|(pat, layer)| pat.iter().any(|&i| i >= layer.neurons));
        if out_of_range {
            return Err(VizError::InvalidConfig("forward pattern names a missing neuron"));
        }
        Ok(())
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Neurons spread evenly: index `i` of `n` sits at `height / (n + 1) * (i + 1)`.
    pub fn neuron_y(&self, layer: usize, index: usize) -> f64 {
        let n = self.layers.get(layer).map_or(0, |l| l.neurons);
        self.height / (n as f64 + 1.0) * (index as f64 + 1.0)
    }

    pub fn neuron_pos(&self, layer: usize, index: usize) -> (f64, f64) {
        let x = self.layers.get(layer).map_or(0.0, |l| l.x);
        (x, self.neuron_y(layer, index))
    }

    /// Dense cross product of `layer` and `layer + 1`; empty for the last layer.
    pub fn connections(&self, layer: usize) -> impl Iterator<Item = Connection> + '_ {
        let (from_n, to_n) = match (self.layers.get(layer), self.layers.get(layer + 1)) {
            (Some(a), Some(b)) => (a.neurons, b.neurons),
            _ => (0, 0),
        };
        (0..from_n).flat_map(move |from| {
            (0..to_n).map(move |to| {
                let (x1, y1) = self.neuron_pos(layer, from);
                let (x2, y2) = self.neuron_pos(layer + 1, to);
                Connection {
                    layer,
                    from,
                    to,
                    x1,
                    y1,
                    x2,
                    y2,
                }
            })
        })
    }

    pub fn all_connections(&self) -> impl Iterator<Item = Connection> + '_ {
        (0..self.layers.len()).flat_map(move |l| self.connections(l))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Emphasis
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeuronLook {
    pub fill: Color,
    pub radius: f64,
}

impl NeuronLook {
    pub const REST: NeuronLook = NeuronLook {
        fill: palette::NEURON,
        radius: 15.0,
    };
    pub const ACTIVE: NeuronLook = NeuronLook {
        fill: palette::ACTIVE,
        radius: 20.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkLook {
    pub stroke: Color,
    pub width: f64,
    pub opacity: f64,
}

impl LinkLook {
    pub const REST: LinkLook = LinkLook {
        stroke: palette::LINK,
        width: 2.0,
        opacity: 0.6,
    };
    pub const ACTIVE: LinkLook = LinkLook {
        stroke: palette::ACTIVE,
        width: 3.0,
        opacity: 1.0,
    };
    pub const GRADIENT: LinkLook = LinkLook {
        stroke: palette::GRADIENT,
        width: 3.0,
        opacity: 1.0,
    };
}

/// Link identity: `(layer, from, to)`.
pub type LinkKey = (usize, usize, usize);

pub const MARKER_RADIUS: f64 = 5.0;

/// Overrides on top of the resting look. Empty maps mean "everything at rest".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkEmphasis {
    neurons: HashMap<(usize, usize), NeuronLook>,
    links: HashMap<LinkKey, LinkLook>,
    /// Gradient markers at link midpoints, by opacity.
    markers: HashMap<LinkKey, f64>,
}

impl NetworkEmphasis {
    pub fn neuron(&self, layer: usize, index: usize) -> NeuronLook {
        self.neurons
            .get(&(layer, index))
            .copied()
            .unwrap_or(NeuronLook::REST)
    }

    pub fn link(&self, key: LinkKey) -> LinkLook {
        self.links.get(&key).copied().unwrap_or(LinkLook::REST)
    }

    pub fn marker(&self, key: LinkKey) -> Option<f64> {
        self.markers.get(&key).copied()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn is_rest(&self) -> bool {
        self.neurons.values().all(|l| *l == NeuronLook::REST)
            && self.links.values().all(|l| *l == LinkLook::REST)
            && self.markers.is_empty()
    }

    pub fn reset(&mut self) {
        self.neurons.clear();
        self.links.clear();
        self.markers.clear();
    }

    pub fn set_neuron(&mut self, layer: usize, index: usize, look: NeuronLook) {
        self.neurons.insert((layer, index), look);
    }

    pub fn set_link(&mut self, key: LinkKey, look: LinkLook) {
        self.links.insert(key, look);
    }

    pub fn set_marker(&mut self, key: LinkKey, opacity: f64) {
        self.markers.insert(key, opacity);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// State machine
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ViewState {
    #[default]
    Idle,
    Forward,
    Backward,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewState::Idle => "idle",
            ViewState::Forward => "forward",
            ViewState::Backward => "backward",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pass {
    Forward,
    Backward,
}

impl From<Pass> for ViewState {
    fn from(p: Pass) -> Self {
        match p {
            Pass::Forward => ViewState::Forward,
            Pass::Backward => ViewState::Backward,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCue {
    /// Everything back to rest; markers removed.
    Reset,
    /// Light the listed neurons of `layer` and their outgoing links.
    Activate { layer: usize, neurons: Vec<usize> },
    /// Every outgoing link of `layer` turns to the gradient look, with a midpoint marker.
    Backprop { layer: usize },
    /// Links of `layer` thin back to width 2 and their markers fade out.
    Settle { layer: usize },
    /// Return to idle.
    Finish,
}

pub struct NeuralNetworkView {
    layout: NetworkLayout,
    timing: SequenceTiming,
    state: ViewState,
    emphasis: NetworkEmphasis,
}

impl NeuralNetworkView {
    pub fn new(layout: NetworkLayout, timing: SequenceTiming) -> Result<Self> {
        layout.validate()?;
        timing.validate()?;
        Ok(Self {
            layout,
            timing,
            state: ViewState::Idle,
            emphasis: NetworkEmphasis::default(),
        })
    }

    pub fn energy_prediction(timing: SequenceTiming) -> Result<Self> {
        Self::new(NetworkLayout::energy_prediction(), timing)
    }

    pub fn layout(&self) -> &NetworkLayout {
        &self.layout
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn emphasis(&self) -> &NetworkEmphasis {
        &self.emphasis
    }

    /// Entry actions are only enabled while idle.
    pub fn can_trigger(&self) -> bool {
        self.state == ViewState::Idle
    }

    /// Left to right: each layer's forward pattern lights up one step apart.
    pub fn forward_script(&self) -> Script<NetworkCue> {
        let t = self.timing;
        let mut script = Script::new().at(0, NetworkCue::Reset);
        for (layer, neurons) in self.layout.forward_pattern.iter().enumerate() {
            script.push(
                t.lead_in_ms + layer as u32 * t.layer_step_ms,
                NetworkCue::Activate {
                    layer,
                    neurons: neurons.clone(),
                },
            );
        }
        let end = t.lead_in_ms + self.layout.layer_count() as u32 * t.layer_step_ms;
        script.at(end, NetworkCue::Reset).at(end, NetworkCue::Finish)
    }

    /// Right to left: each layer's links flash with gradient markers, then settle.
    pub fn backward_script(&self) -> Script<NetworkCue> {
        let t = self.timing;
        let n = self.layout.layer_count() as u32;
        let mut script = Script::new().at(0, NetworkCue::Reset);
        for layer in (0..self.layout.layer_count()).rev() {
            let at = (n - 1 - layer as u32) * t.layer_step_ms;
            script.push(at, NetworkCue::Backprop { layer });
            script.push(at + t.transition_ms, NetworkCue::Settle { layer });
        }
        let end = n * t.layer_step_ms;
        script.at(end, NetworkCue::Reset).at(end, NetworkCue::Finish)
    }

    /// Leave idle for `pass` and hand back the script to play.
    pub fn begin(&mut self, pass: Pass) -> Result<Script<NetworkCue>> {
        if !self.can_trigger() {
            return Err(VizError::AnimationInFlight { state: self.state });
        }
        self.state = pass.into();
        Ok(match pass {
            Pass::Forward => self.forward_script(),
            Pass::Backward => self.backward_script(),
        })
    }

    /// Drop back to idle at rest without finishing the script.
    pub fn abort(&mut self) {
        self.emphasis.reset();
        self.state = ViewState::Idle;
    }

    pub fn apply(&mut self, cue: &NetworkCue) {
        let last = self.layout.layer_count().saturating_sub(1);
        match cue {
            NetworkCue::Reset => self.emphasis.reset(),
            NetworkCue::Activate { layer, neurons } => {
                let layer = *layer;
                for &i in neurons {
                    self.emphasis.set_neuron(layer, i, NeuronLook::ACTIVE);
                }
                if layer < last {
                    let lit: Vec<_> = self
                        .layout
                        .connections(layer)
                        .filter(|c| neurons.contains(&c.from))
                        .map(|c| (c.layer, c.from, c.to))
                        .collect();
                    for key in lit {
                        self.emphasis.set_link(key, LinkLook::ACTIVE);
                    }
                }
            }
            NetworkCue::Backprop { layer } => {
                let keys: Vec<_> = self
                    .layout
                    .connections(*layer)
                    .map(|c| (c.layer, c.from, c.to))
                    .collect();
                for key in keys {
                    self.emphasis.set_link(key, LinkLook::GRADIENT);
                    self.emphasis.set_marker(key, 1.0);
                }
            }
            NetworkCue::Settle { layer } => {
                let keys: Vec<_> = self
                    .layout
                    .connections(*layer)
                    .map(|c| (c.layer, c.from, c.to))
                    .collect();
                for key in keys {
                    let look = self.emphasis.link(key);
                    self.emphasis.set_link(key, LinkLook { width: 2.0, ..look });
                    self.emphasis.set_marker(key, 0.0);
                }
            }
            NetworkCue::Finish => self.state = ViewState::Idle,
        }
    }

    pub fn scene(&self) -> Scene {
        let layout = &self.layout;
        let ms = self.timing.transition_ms;
        let mut scene = Scene::new(layout.width, layout.height);
        let label = Style::filled(palette::LABEL);

        scene.push(
            "title",
            Shape::Text {
                x: layout.width / 2.0,
                y: 15.0,
                text: layout.title.clone(),
                anchor: TextAnchor::Middle,
                size_px: 16.0,
            },
            label,
            0,
        );

        for c in layout.all_connections() {
            let look = self.emphasis.link((c.layer, c.from, c.to));
            scene.push(
                format!("link-{}-{}-{}", c.layer, c.from, c.to),
                Shape::Line {
                    x1: c.x1,
                    y1: c.y1,
                    x2: c.x2,
                    y2: c.y2,
                },
                Style::stroked(look.stroke, look.width).with_opacity(look.opacity),
                ms,
            );
        }

        for (l, layer) in layout.layers.iter().enumerate() {
            scene.push(
                format!("layer-label-{l}"),
                Shape::Text {
                    x: layer.x,
                    y: 35.0,
                    text: layer.name.clone(),
                    anchor: TextAnchor::Middle,
                    size_px: 12.0,
                },
                label,
                0,
            );
            for i in 0..layer.neurons {
                let look = self.emphasis.neuron(l, i);
                let (cx, cy) = layout.neuron_pos(l, i);
                scene.push(
                    format!("neuron-{l}-{i}"),
                    Shape::Circle {
                        cx,
                        cy,
                        r: look.radius,
                    },
                    Style::filled(look.fill),
                    ms,
                );
            }
        }

        if let Some(first) = layout.layers.first() {
            for (i, text) in layout.input_labels.iter().enumerate().take(first.neurons) {
                scene.push(
                    format!("input-label-{i}"),
                    Shape::Text {
                        x: first.x - 50.0,
                        y: layout.neuron_y(0, i) + 5.0,
                        text: text.clone(),
                        anchor: TextAnchor::Start,
                        size_px: 12.0,
                    },
                    label,
                    0,
                );
            }
        }

        for c in layout.all_connections() {
            let key = (c.layer, c.from, c.to);
            if let Some(opacity) = self.emphasis.marker(key) {
                let (cx, cy) = c.midpoint();
                scene.push(
                    format!("marker-{}-{}-{}", c.layer, c.from, c.to),
                    Shape::Circle {
                        cx,
                        cy,
                        r: MARKER_RADIUS,
                    },
                    Style::filled(palette::GRADIENT).with_opacity(opacity),
                    ms,
                );
            }
        }

        scene
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Animator
// ═══════════════════════════════════════════════════════════════════════════

/// A mounted [`NeuralNetworkView`] whose passes play against a scheduler.
///
/// At most one script is attached at a time; unmounting (or dropping) detaches it.
pub struct NetworkAnimator {
    view: Rc<RefCell<NeuralNetworkView>>,
    scheduler: Rc<dyn Scheduler>,
    sink: Rc<RefCell<dyn RenderSink>>,
    running: Option<AnimationHandle>,
    mounted: bool,
}

impl NetworkAnimator {
    pub fn mount<S: RenderSink + 'static>(
        scheduler: Rc<dyn Scheduler>,
        view: NeuralNetworkView,
        sink: S,
    ) -> Self {
        let sink: Rc<RefCell<dyn RenderSink>> = Rc::new(RefCell::new(sink));
        sink.borrow_mut().present(&view.scene());
        info!(view = "neural-network", layers = view.layout().layer_count(), "mounted");
        Self {
            view: Rc::new(RefCell::new(view)),
            scheduler,
            sink,
            running: None,
            mounted: true,
        }
    }

    pub fn view(&self) -> Ref<'_, NeuralNetworkView> {
        self.view.borrow()
    }

    pub fn state(&self) -> ViewState {
        self.view.borrow().state()
    }

    pub fn can_trigger(&self) -> bool {
        self.mounted && self.view.borrow().can_trigger()
    }

    /// Start a pass. Fails with [`VizError::AnimationInFlight`] unless idle.
    pub fn trigger(&mut self, pass: Pass) -> Result<()> {
        if !self.mounted {
            return Err(VizError::Unmounted);
        }
        let script = self.view.borrow_mut().begin(pass)?;
        info!(?pass, cues = script.len(), duration_ms = script.duration_ms(), "sequence start");

        let (view, sink) = (self.view.clone(), self.sink.clone());
        let played = script.play(self.scheduler.clone(), move |cue: NetworkCue| {
            let scene = {
                let mut v = view.borrow_mut();
                v.apply(&cue);
                v.scene()
            };
            sink.borrow_mut().present(&scene);
            if cue == NetworkCue::Finish {
                info!(?pass, "sequence finished");
            }
        });

        match played {
            Ok(handle) => {
                self.running = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.view.borrow_mut().abort();
                Err(e)
            }
        }
    }

    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        if let Some(mut handle) = self.running.take() {
            handle.cancel();
        }
        info!(view = "neural-network", "unmounted");
    }
}

impl Drop for NetworkAnimator {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;

    fn view() -> NeuralNetworkView {
        NeuralNetworkView::energy_prediction(SequenceTiming::default()).unwrap()
    }

    fn recording() -> (Rc<RefCell<Vec<Scene>>>, impl FnMut(&Scene)) {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let f = frames.clone();
        (frames, move |s: &Scene| f.borrow_mut().push(s.clone()))
    }

    #[test]
    fn layout_positions_and_connections() {
        let layout = NetworkLayout::energy_prediction();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.neuron_y(0, 0), 80.0);
        assert_eq!(layout.neuron_y(1, 4), 400.0 / 6.0 * 5.0);
        assert_eq!(layout.neuron_y(3, 0), 200.0);

        assert_eq!(layout.connections(0).count(), 20);
        assert_eq!(layout.connections(1).count(), 20);
        assert_eq!(layout.connections(2).count(), 4);
        assert_eq!(layout.connections(3).count(), 0);
        assert_eq!(layout.all_connections().count(), 44);

        let c = layout.connections(2).last().unwrap();
        assert_eq!((c.from, c.to), (3, 0));
        assert_eq!(c.midpoint(), ((350.0 + 500.0) / 2.0, (320.0 + 200.0) / 2.0));
    }

    #[test]
    fn layout_validation() {
        let mut bad = NetworkLayout::energy_prediction();
        bad.forward_pattern[3] = vec![1];
        assert!(bad.validate().is_err());

        let mut bad = NetworkLayout::energy_prediction();
        bad.forward_pattern.pop();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn forward_script_timeline() {
        let script = view().forward_script();
        let at: Vec<u32> = script.cues().iter().map(|c| c.at_ms).collect();
        assert_eq!(at, vec![0, 500, 1500, 2500, 3500, 4500, 4500]);
        assert_eq!(
            script.cues()[2].action,
            NetworkCue::Activate {
                layer: 1,
                neurons: vec![1, 3]
            }
        );
        assert_eq!(script.cues()[6].action, NetworkCue::Finish);
    }

    #[test]
    fn backward_script_timeline() {
        let script = view().backward_script();
        let timeline: Vec<(u32, NetworkCue)> = script
            .timeline()
            .into_iter()
            .map(|c| (c.at_ms, c.action.clone()))
            .collect();
        assert_eq!(
            timeline,
            vec![
                (0, NetworkCue::Reset),
                (0, NetworkCue::Backprop { layer: 3 }),
                (500, NetworkCue::Settle { layer: 3 }),
                (1000, NetworkCue::Backprop { layer: 2 }),
                (1500, NetworkCue::Settle { layer: 2 }),
                (2000, NetworkCue::Backprop { layer: 1 }),
                (2500, NetworkCue::Settle { layer: 1 }),
                (3000, NetworkCue::Backprop { layer: 0 }),
                (3500, NetworkCue::Settle { layer: 0 }),
                (4000, NetworkCue::Reset),
                (4000, NetworkCue::Finish),
            ]
        );
    }

    #[test]
    fn activate_lights_neurons_and_outgoing_links() {
        let mut v = view();
        v.apply(&NetworkCue::Activate {
            layer: 0,
            neurons: vec![0, 2],
        });
        let e = v.emphasis();
        assert_eq!(e.neuron(0, 0), NeuronLook::ACTIVE);
        assert_eq!(e.neuron(0, 1), NeuronLook::REST);
        assert_eq!(e.link((0, 2, 4)), LinkLook::ACTIVE);
        assert_eq!(e.link((0, 1, 4)), LinkLook::REST);

        let scene = v.scene();
        let neuron = scene.get("neuron-0-2").unwrap();
        assert_eq!(neuron.style.fill, Some(palette::ACTIVE));
        assert_eq!(neuron.transition_ms, 500);
    }

    #[test]
    fn backprop_then_settle() {
        let mut v = view();
        v.apply(&NetworkCue::Backprop { layer: 2 });
        assert_eq!(v.emphasis().marker_count(), 4);
        assert_eq!(v.emphasis().link((2, 1, 0)), LinkLook::GRADIENT);
        assert_eq!(v.scene().keys_with_prefix("marker-").count(), 4);

        v.apply(&NetworkCue::Settle { layer: 2 });
        let look = v.emphasis().link((2, 1, 0));
        assert_eq!(look.width, 2.0);
        assert_eq!(look.stroke, palette::GRADIENT);
        assert_eq!(v.emphasis().marker((2, 1, 0)), Some(0.0));

        v.apply(&NetworkCue::Reset);
        assert!(v.emphasis().is_rest());
        assert_eq!(v.scene().keys_with_prefix("marker-").count(), 0);
    }

    #[test]
    fn forward_rejects_retrigger_and_returns_to_rest() {
        let clock = Rc::new(VirtualClock::new());
        let (frames, sink) = recording();
        let mut nn = NetworkAnimator::mount(clock.clone(), view(), sink);
        assert_eq!(frames.borrow().len(), 1);

        nn.trigger(Pass::Forward).unwrap();
        assert_eq!(nn.state(), ViewState::Forward);
        assert!(!nn.can_trigger());
        assert_eq!(
            nn.trigger(Pass::Forward),
            Err(VizError::AnimationInFlight {
                state: ViewState::Forward
            })
        );

        clock.advance(2000);
        assert_eq!(
            nn.trigger(Pass::Backward),
            Err(VizError::AnimationInFlight {
                state: ViewState::Forward
            })
        );
        assert_eq!(nn.view().emphasis().neuron(1, 3), NeuronLook::ACTIVE);

        clock.advance(2500);
        assert_eq!(nn.state(), ViewState::Idle);
        assert!(nn.view().emphasis().is_rest());
        assert!(nn.can_trigger());

        let last = frames.borrow().last().cloned().unwrap();
        let link = last.get("link-0-0-0").unwrap();
        assert_eq!(link.style.stroke, Some(palette::LINK));
        assert_eq!(link.style.opacity, 0.6);
    }

    #[test]
    fn backward_pass_ends_idle() {
        let clock = Rc::new(VirtualClock::new());
        let (_frames, sink) = recording();
        let mut nn = NetworkAnimator::mount(clock.clone(), view(), sink);

        nn.trigger(Pass::Backward).unwrap();
        clock.advance(1000);
        assert_eq!(nn.view().emphasis().marker_count(), 4);
        clock.advance(3000);
        assert_eq!(nn.state(), ViewState::Idle);
        assert!(nn.view().emphasis().is_rest());

        // A second pass is accepted once idle.
        nn.trigger(Pass::Forward).unwrap();
        clock.advance(5000);
        assert_eq!(nn.state(), ViewState::Idle);
    }

    #[test]
    fn unmount_mid_sequence_stops_drawing() {
        let clock = Rc::new(VirtualClock::new());
        let (frames, sink) = recording();
        let mut nn = NetworkAnimator::mount(clock.clone(), view(), sink);

        nn.trigger(Pass::Forward).unwrap();
        clock.advance(1000);
        let drawn = frames.borrow().len();
        nn.unmount();
        assert!(!nn.can_trigger());
        assert_eq!(nn.trigger(Pass::Backward), Err(VizError::Unmounted));

        clock.advance(10_000);
        assert_eq!(frames.borrow().len(), drawn);
        assert_eq!(clock.pending(), 0);
    }
}
