fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The NewsRecommend schema lives next to this crate. The server side is what
    // this binary runs; the client is used by the integration tests and by
    // backends talking to the server.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(&["proto/newsrecommend.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/newsrecommend.proto");
    Ok(())
}
