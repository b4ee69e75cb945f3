#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use avr_device::atmega128a::Peripherals;
    use avr_device::interrupt::{self, Mutex};
    use core::cell::RefCell;
    use core::convert::Infallible;
    use panic_halt as _;

    use seize_secure::application::Application;
    use seize_secure::config::GameConfig;
    use seize_secure::drivers::{ButtonHandler, FlagLeds, Lcd, SerialConsole, ALL_LINES};
    use seize_secure::hal::{board, uart, ExtInt, Power, Prescaler, TickTimer, Watchdog, WatchdogTimeout};
    use seize_secure::logger::Trace;
    use seize_secure::os::{Event, EventQueue};

    // Filled by the interrupt handlers, drained by the main loop
    static EVENTS: Mutex<RefCell<EventQueue>> = Mutex::new(RefCell::new(EventQueue::new()));

    // Edge classifier plus the interrupt lines whose sense it flips
    static EDGES: Mutex<RefCell<Option<(ExtInt, ButtonHandler)>>> = Mutex::new(RefCell::new(None));

    fn infallible<T>(result: Result<T, Infallible>) -> T {
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    #[avr_device::entry]
    fn main() -> ! {
        let Some(dp) = Peripherals::take() else {
            #[allow(clippy::empty_loop)]
            loop {}
        };

        let pins = board::take(dp.PORTA, dp.PORTC, dp.PORTD);
        let lcd = infallible(Lcd::new(
            pins.lcd_rs,
            pins.lcd_rw,
            pins.lcd_en,
            pins.lcd_d4,
            pins.lcd_d5,
            pins.lcd_d6,
            pins.lcd_d7,
        ));
        let leds = infallible(FlagLeds::new(pins.red_led, pins.green_led));
        #[cfg(feature = "debug")]
        let trace = Some(Trace::new(SerialConsole::new(dp.USART0)));
        #[cfg(not(feature = "debug"))]
        let trace: Option<Trace<SerialConsole>> = None;
        let mut app = Application::new(GameConfig::default(), lcd, leds, trace);

        let buttons = ButtonHandler::new();
        let mut exint = ExtInt::new(dp.EXINT);
        exint.set_sense(buttons.falling_mask());
        exint.clear_pending(ALL_LINES);
        exint.enable();
        interrupt::free(|cs| {
            EDGES.borrow(cs).replace(Some((exint, buttons)));
        });

        let mut timer = TickTimer::new(dp.TC0);
        let mut power = Power::new(dp.CPU);
        let mut watchdog = Watchdog::new(dp.WDT);
        watchdog.start(WatchdogTimeout::Ms260);
        timer.start(Prescaler::Div256);

        // Enable interrupts globally
        unsafe { interrupt::enable() };

        loop {
            match interrupt::free(|cs| EVENTS.borrow(cs).borrow_mut().pop()) {
                // Board pins cannot fail, so there is no error to act on
                Ok(event) => {
                    let _ = app.handle(event);
                }
                Err(nb::Error::WouldBlock) => {
                    let dropped = interrupt::free(|cs| EVENTS.borrow(cs).borrow_mut().take_dropped());
                    app.note_dropped(dropped);
                    watchdog.feed();
                    // The next tick wakes us within 4ms at the latest
                    power.enter_idle_mode();
                }
                Err(nb::Error::Other(never)) => match never {},
            }
        }
    }

    fn push(event: Event) {
        interrupt::free(|cs| {
            // A full queue counts the loss itself
            let _ = EVENTS.borrow(cs).borrow_mut().push(event);
        });
    }

    fn on_edge(line: u8) {
        interrupt::free(|cs| {
            let mut edges = EDGES.borrow(cs).borrow_mut();
            let Some((exint, buttons)) = edges.as_mut() else {
                return;
            };
            // The vector's own flag is already cleared on entry
            let pending = (1 << line) | exint.pending();
            let batch = buttons.classify(pending);
            exint.set_sense(buttons.falling_mask());
            // Every line is acknowledged, so an edge landing between the
            // read above and this write is lost
            exint.clear_pending(ALL_LINES);
            for edge in batch.iter() {
                push(Event::Edge(edge));
            }
        });
    }

    #[avr_device::interrupt(atmega128a)]
    fn INT0() {
        on_edge(0);
    }

    #[avr_device::interrupt(atmega128a)]
    fn INT1() {
        on_edge(1);
    }

    #[avr_device::interrupt(atmega128a)]
    fn INT2() {
        on_edge(2);
    }

    #[avr_device::interrupt(atmega128a)]
    fn INT3() {
        on_edge(3);
    }

    #[avr_device::interrupt(atmega128a)]
    fn TIMER0_COMP() {
        push(Event::Tick);
    }

    #[avr_device::interrupt(atmega128a)]
    fn USART0_UDRE() {
        uart::service_tx();
    }
}

// The game logic is exercised by the library tests on the host
#[cfg(not(target_arch = "avr"))]
fn main() {}
