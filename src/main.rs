use softpipe::window::App;

fn main() {
    env_logger::init();
    App::run();
}
