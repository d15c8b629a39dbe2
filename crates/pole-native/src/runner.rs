use crate::sim::SimulatedHost;
use pole_core::{Clock, ConfigStore, SessionState, TickScheduler};

/// Poll the clock until the session stops, ticking whenever the scheduler
/// says one is due. `idle` runs on polls that did not tick; the binary yields
/// the thread there.
///
/// `max_ticks` of zero means no limit. Returns the number of ticks run.
pub fn run_loop<C, S>(
    session: &mut SessionState,
    host: &mut SimulatedHost,
    store: &mut S,
    clock: &C,
    max_ticks: u64,
    mut idle: impl FnMut(),
) -> u64
where
    C: Clock + ?Sized,
    S: ConfigStore + ?Sized,
{
    let mut scheduler = TickScheduler::from_display_hz(host.display_frequency(), clock.now());
    let mut ticks = 0;
    while session.is_running() {
        let now = clock.now();
        if scheduler.poll(now, session.is_editing()) {
            host.advance(now);
            while let Some(command) = host.take_command() {
                log::info!("[input] {:?}", command);
                session.command(command, host, store, now);
            }
            session.tick(host, store, now);
            ticks += 1;
            if max_ticks > 0 && ticks >= max_ticks {
                log::info!("[loop] tick limit {} reached", max_ticks);
                session.stop();
            }
        } else {
            idle();
        }
    }
    ticks
}
