//! # Fault Dispatcher
//!
//! Body of the crash screen worker. It sleeps on the fault queue, looks for the
//! application thread that stopped on a break or fault, renders the crash screen for
//! it once, then parks for good.

use crate::config::CrashScreenConfig;
use crate::graphics::SurfaceSlot;
use crate::ipc::FaultQueue;
use crate::platform::Platform;
use crate::process::{find_crashed_thread, ThreadInfo, Tid};
use crate::screen::draw_crash_screen;
use crate::CrashScreen;

/// Dispatcher lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// Blocked on the fault queue
    Waiting,
    /// Drawing the screen for a thread
    Rendering(Tid),
    /// Finished; never leaves this state
    Halted,
}

pub struct Dispatcher<'a> {
    queue: &'a FaultQueue,
    config: CrashScreenConfig,
    state: DispatcherState,
}

impl<'a> Dispatcher<'a> {
    pub fn new(queue: &'a FaultQueue, config: CrashScreenConfig) -> Self {
        Self {
            queue,
            config,
            state: DispatcherState::Waiting,
        }
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    /// Block until a notification arrives and a crashed thread can be found.
    ///
    /// Wake-ups with no crashed thread go back to waiting.
    pub fn wait_for_crashed_thread<P: Platform>(&mut self, platform: &mut P) -> ThreadInfo {
        loop {
            let kind = platform.wait(self.queue);
            log::debug!("crash screen: woken by {:?}", kind);

            if let Some(thread) = find_crashed_thread(platform.threads()) {
                log::info!("crash screen: thread {} crashed (priority {})", thread.id, thread.priority);
                return thread;
            }

            log::debug!("crash screen: no crashed thread found, waiting again");
        }
    }

    /// Wait for a crash and draw its screen on the registered surface.
    ///
    /// Returns the thread that was drawn, or `None` if its registers or a surface
    /// were unavailable. Either way the dispatcher ends up halted.
    pub fn handle_crash<P: Platform>(&mut self, platform: &mut P, surface: &SurfaceSlot) -> Option<Tid> {
        if self.state == DispatcherState::Halted {
            return None;
        }

        let thread = self.wait_for_crashed_thread(platform);
        self.state = DispatcherState::Rendering(thread.id);

        platform.writeback_dcache();
        let drawn = match platform.snapshot(thread.id) {
            Some(context) => {
                let config = &self.config;
                let drawn = surface
                    .with_surface(|framebuffer| {
                        draw_crash_screen(platform, framebuffer, config, thread.id, &context)
                    })
                    .is_some();
                if !drawn {
                    log::error!("crash screen: no surface registered");
                }
                drawn
            }
            None => {
                log::error!("crash screen: no saved registers for thread {}", thread.id);
                false
            }
        };

        self.state = DispatcherState::Halted;
        drawn.then_some(thread.id)
    }

    /// Park the worker for good
    pub fn halt(&mut self) -> ! {
        self.state = DispatcherState::Halted;
        log::info!("crash screen: halted");
        halt()
    }
}

/// Idle forever
pub fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

/// Crash screen worker entry point
pub fn run<P: Platform>(platform: &mut P) -> ! {
    let screen = match CrashScreen::instance() {
        Ok(screen) => screen,
        Err(err) => {
            log::error!("crash screen: {}", err);
            halt()
        }
    };

    let config = match screen.config() {
        Ok(config) => *config,
        Err(err) => {
            log::error!("crash screen: {}", err);
            halt()
        }
    };

    log::info!("crash screen: worker started");
    let mut dispatcher = Dispatcher::new(screen.queue(), config);
    dispatcher.handle_crash(platform, screen.surface());
    dispatcher.halt()
}
