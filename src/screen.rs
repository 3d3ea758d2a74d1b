use super::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Front end fed by a [`Screen`].
///
/// Gets every signal in emission order together with the latest snapshot,
/// which is at least as new as the signal.
#[async_trait::async_trait]
pub trait Presenter: Send + 'static {
    async fn render(&mut self, signal: &Signal, snapshot: &Snapshot);
}

/// Runs a [`Presenter`] in its own task so rendering never holds up the
/// dispatcher worker.
///
/// - the worker pushes signals into the channel and moves on
/// - the screen drains them one by one into the presenter
/// - once every sender is gone the presenter is handed back
pub struct Screen<P> {
    presenter: P,
    signals: UnboundedReceiver<Signal>,
    view: watch::Receiver<Snapshot>,
}

impl<P: Presenter> Screen<P> {
    pub fn spawn(
        presenter: P,
        signals: UnboundedReceiver<Signal>,
        view: watch::Receiver<Snapshot>,
    ) -> JoinHandle<P> {
        let screen = Self {
            presenter,
            signals,
            view,
        };
        tokio::spawn(screen.run())
    }
    async fn run(mut self) -> P {
        while let Some(ref signal) = self.signals.recv().await {
            let snapshot = self.view.borrow().clone();
            self.presenter.render(signal, &snapshot).await;
        }
        log::debug!("[screen] signal channel closed");
        self.presenter
    }
}
