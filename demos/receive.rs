use stream_client::{Endpoint, StreamClient};

fn main() {
    env_logger::init();

    let endpoint = Endpoint::new("127.0.0.1", 8080).expect("Endpoint is valid");

    let mut client = StreamClient::connect(endpoint).expect("Could not connect to server");

    client.run().expect("Error while reading from server");
}
